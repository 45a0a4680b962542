//! Mascot configuration.
//!
//! [`MascotOptions`] is what callers hand in: every field optional, loadable
//! from JSON. [`MascotConfig`] is the resolved, immutable value the
//! controller runs with. Resolution happens exactly once, at mount, by
//! merging the options with an [`Environment`].
//!
//! # Example
//!
//! ```ignore
//! use spark_mascot::config::{MascotOptions, StaticEnvironment, resolve_runtime_config};
//!
//! let options = MascotOptions::from_json(r#"{ "eyeClampX": 10 }"#)?;
//! let config = resolve_runtime_config(&options, &StaticEnvironment::default());
//! assert_eq!(config.eye_clamp_x, 10.0);
//! ```

use std::path::Path;
use std::rc::Rc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_EYE_CLAMP_X, DEFAULT_EYE_CLAMP_Y};
use crate::error::Result;

// =============================================================================
// OPTIONS (partial, caller-supplied)
// =============================================================================

/// Caller-supplied configuration. `None` means "use the default" for clamps
/// and "detect from the environment" for the two capability flags.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MascotOptions {
    pub eye_clamp_x: Option<f64>,
    pub eye_clamp_y: Option<f64>,
    pub reduced_motion: Option<bool>,
    pub is_touch_device: Option<bool>,
}

impl MascotOptions {
    /// Parse options from a JSON document (camelCase keys).
    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }

    /// Read and parse a JSON options file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_json(&source)
    }

    pub fn with_clamp(mut self, x: f64, y: f64) -> Self {
        self.eye_clamp_x = Some(x);
        self.eye_clamp_y = Some(y);
        self
    }

    pub fn with_reduced_motion(mut self, value: bool) -> Self {
        self.reduced_motion = Some(value);
        self
    }

    pub fn with_touch_device(mut self, value: bool) -> Self {
        self.is_touch_device = Some(value);
        self
    }
}

// =============================================================================
// RESOLVED CONFIG
// =============================================================================

/// Resolved configuration. Never re-detected after mount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MascotConfig {
    pub eye_clamp_x: f64,
    pub eye_clamp_y: f64,
    pub reduced_motion: bool,
    pub is_touch_device: bool,
}

impl Default for MascotConfig {
    fn default() -> Self {
        Self {
            eye_clamp_x: DEFAULT_EYE_CLAMP_X,
            eye_clamp_y: DEFAULT_EYE_CLAMP_Y,
            reduced_motion: false,
            is_touch_device: false,
        }
    }
}

impl MascotConfig {
    /// Config from options alone, with undetected capabilities treated as off.
    pub fn from_options(options: &MascotOptions) -> Self {
        Self {
            eye_clamp_x: options.eye_clamp_x.unwrap_or(DEFAULT_EYE_CLAMP_X),
            eye_clamp_y: options.eye_clamp_y.unwrap_or(DEFAULT_EYE_CLAMP_Y),
            reduced_motion: options.reduced_motion.unwrap_or(false),
            is_touch_device: options.is_touch_device.unwrap_or(false),
        }
    }
}

// =============================================================================
// ENVIRONMENT DETECTION
// =============================================================================

/// Source of the two environment-detected capabilities.
pub trait Environment {
    fn prefers_reduced_motion(&self) -> bool;
    fn is_touch_device(&self) -> bool;
}

/// Reads `MASCOT_REDUCED_MOTION` and `MASCOT_TOUCH` from the process
/// environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnvironment;

pub const REDUCED_MOTION_VAR: &str = "MASCOT_REDUCED_MOTION";
pub const TOUCH_VAR: &str = "MASCOT_TOUCH";

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|value| is_truthy(&value))
        .unwrap_or(false)
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on" | "reduce"
    )
}

impl Environment for ProcessEnvironment {
    fn prefers_reduced_motion(&self) -> bool {
        env_flag(REDUCED_MOTION_VAR)
    }

    fn is_touch_device(&self) -> bool {
        env_flag(TOUCH_VAR)
    }
}

/// Fixed capabilities, for tests and hosts that detect on their own.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticEnvironment {
    pub reduced_motion: bool,
    pub touch: bool,
}

impl Environment for StaticEnvironment {
    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn is_touch_device(&self) -> bool {
        self.touch
    }
}

/// Merge caller options with the environment. An explicit option wins.
pub fn resolve_runtime_config(options: &MascotOptions, env: &dyn Environment) -> MascotConfig {
    let base = MascotConfig::from_options(options);
    MascotConfig {
        reduced_motion: options
            .reduced_motion
            .unwrap_or_else(|| env.prefers_reduced_motion()),
        is_touch_device: options
            .is_touch_device
            .unwrap_or_else(|| env.is_touch_device()),
        ..base
    }
}

// =============================================================================
// RANDOM DELAYS
// =============================================================================

/// Picks a delay in `[min, max)`. Injected so schedulers are testable.
pub type RandomDelay = Rc<dyn Fn(f64, f64) -> f64>;

/// Uniform delay from the thread RNG.
pub fn uniform_delay() -> RandomDelay {
    Rc::new(|min, max| {
        if max <= min {
            return min;
        }
        rand::thread_rng().gen_range(min..max)
    })
}

/// Always the lower bound. Handy for deterministic tests.
pub fn min_delay() -> RandomDelay {
    Rc::new(|min, _| min)
}

// =============================================================================
// TESTS
// =============================================================================
