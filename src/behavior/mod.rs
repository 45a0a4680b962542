//! Behavior Resolvers - Pure decision functions
//!
//! - [`state`] - Requested state vs. the "very close" alert lock
//! - [`eyelids`] - Eyelid pose from proximity, poke, blink and explicit squint
//!
//! Both are side-effect free; the controller feeds them its flags and
//! applies the answer.

pub mod eyelids;
pub mod state;

pub use eyelids::{EyelidInputs, resolve_eyelid_from_proximity};
pub use state::{StateResolution, resolve_state_with_very_close};
