//! Engine - Event loop and timer bookkeeping
//!
//! - [`clock`] - Thread-local cooperative loop: virtual time, timeouts,
//!   animation frames
//! - [`timers`] - Keyed single-shot timer registry owned by each mascot

pub mod clock;
pub mod timers;

pub use clock::{
    FRAME_INTERVAL_MS, FrameHandle, TimerHandle, advance_by, advance_to, cancel_animation_frame,
    clear_timeout, now, pending_frames, pending_timers, request_animation_frame, reset_clock,
    set_timeout,
};
pub use timers::{TimerKey, TimerRegistry};
