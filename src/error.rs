//! Error type for the few fallible mascot operations.
//!
//! Everything else in the crate declines silently (see the controller docs).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MascotError {
    #[error("mascot is already mounted")]
    AlreadyMounted,

    #[error("mascot was destroyed and cannot be mounted again")]
    Destroyed,

    #[error("surface bounds are not usable ({width} x {height})")]
    InvalidSurface { width: f64, height: f64 },

    #[error("invalid mascot options: {0}")]
    Config(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MascotError>;
