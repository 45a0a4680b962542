//! # spark-mascot
//!
//! Behavior engine for an animated pair of eyes that follow the pointer.
//!
//! Built on [spark-signals](https://github.com/RLabs-Inc/spark-signals) for the
//! reactive pointer state and the reactive render sink.
//!
//! ## Architecture
//!
//! Everything runs on one thread, cooperatively, on a virtual clock:
//! ```text
//! pointer events → Pointer Sampler → Mascot Controller → Render Sink
//!                                      ↑          ↑
//!                          Blink Scheduler    Glance Scheduler
//! ```
//!
//! The controller reconciles pointer proximity, idle detection, random
//! blinks and glances, pokes and host commands into one consistent view.
//! Hosts advance the [`engine::clock`] in real time; tests advance it by hand.
//!
//! ## Modules
//!
//! - [`types`] - States, positions, bounds, view
//! - [`engine`] - Cooperative clock and keyed timer registry
//! - [`state`] - Pointer stream, sampler, idle detection, terminal input
//! - [`behavior`] - Pure state and eyelid resolvers
//! - [`schedulers`] - Blink and glance loops
//! - [`mascot`] - The controller
//! - [`renderer`] - Render sink contract, reactive and terminal sinks

pub mod behavior;
pub mod config;
pub mod constants;
pub mod engine;
pub mod error;
pub mod mascot;
pub mod renderer;
pub mod schedulers;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use config::{
    Environment, MascotConfig, MascotOptions, ProcessEnvironment, RandomDelay,
    StaticEnvironment, min_delay, resolve_runtime_config, uniform_delay,
};

pub use error::{MascotError, Result};

pub use engine::{
    FRAME_INTERVAL_MS, TimerKey, TimerRegistry, advance_by, advance_to, now, reset_clock,
};

pub use mascot::{Lifecycle, Mascot, MascotBuilder};

pub use renderer::{RenderSink, SignalSink, TerminalSink, VisualClasses, pupil_offset};

pub use state::pointer::{
    PointerAction, PointerEvent, dispatch as dispatch_pointer, on_pointer_down, on_pointer_move,
    reset_pointer_state,
};
