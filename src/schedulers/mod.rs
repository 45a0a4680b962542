//! Schedulers - Self-perpetuating idle behaviors
//!
//! - [`blink`] - Random blinks
//! - [`glance`] - Random glances toward center, bucketed by pointer state
//!
//! Each scheduler talks to its owner through a small capability trait held
//! as a `Weak`, and arms its timers in the owner's [`TimerRegistry`].
//!
//! [`TimerRegistry`]: crate::engine::timers::TimerRegistry

pub mod blink;
pub mod glance;

pub use blink::{BlinkScheduler, BlinkTarget};
pub use glance::{GlanceDelays, GlanceHost, GlanceScheduler};
