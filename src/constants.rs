//! Thresholds and durations shared by the controller and schedulers.
//!
//! Distances are in surface units (pixels for a browser-like host, virtual
//! pixels for the terminal sink). Times are in milliseconds.

// =============================================================================
// Distance thresholds
// =============================================================================

/// Pointer closer than this produces a light squint.
pub const SQUINT_THRESHOLD: f64 = 100.0;
/// Pointer closer than this locks the mascot into `alert`.
pub const EXPAND_THRESHOLD: f64 = 30.0;

// =============================================================================
// Durations
// =============================================================================

pub const IDLE_THRESHOLD_MS: f64 = 5000.0;
pub const POKE_DURATION_MS: f64 = 2000.0;
pub const BLINK_DURATION_MS: f64 = 400.0;

pub const BLINK_DELAY_MIN_MS: f64 = 1500.0;
pub const BLINK_DELAY_MAX_MS: f64 = 4000.0;

pub const GLANCE_DURATION_MIN_MS: f64 = 500.0;
pub const GLANCE_DURATION_MAX_MS: f64 = 1000.0;
pub const GLANCE_DELAY_IDLE_MIN_MS: f64 = 2000.0;
pub const GLANCE_DELAY_IDLE_MAX_MS: f64 = 3000.0;
pub const GLANCE_DELAY_CLOSE_MIN_MS: f64 = 1000.0;
pub const GLANCE_DELAY_CLOSE_MAX_MS: f64 = 2000.0;
pub const GLANCE_DELAY_FAR_MIN_MS: f64 = 6000.0;
pub const GLANCE_DELAY_FAR_MAX_MS: f64 = 10000.0;

// =============================================================================
// Movement
// =============================================================================

/// Pupil offset relative to the iris offset.
pub const PUPIL_OFFSET_MULTIPLIER: f64 = 0.15;
/// Pointer delta is divided by this before it becomes a gaze position.
pub const POINTER_DELTA_DIVISOR: f64 = 10.0;

pub const DEFAULT_EYE_CLAMP_X: f64 = 20.0;
pub const DEFAULT_EYE_CLAMP_Y: f64 = 15.0;

/// Poke count at which the eye renders reddened.
pub const REDDEN_THRESHOLD: u32 = 2;

// =============================================================================
// Thinking oscillation
// =============================================================================

pub const THINKING_ANIMATION_DURATION_MS: f64 = 1500.0;
pub const THINKING_ANIMATION_AMPLITUDE: f64 = 6.0;
