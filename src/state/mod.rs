//! State Module - Pointer-driven runtime state
//!
//! - **Pointer** - Global pointer stream, handler registry, reactive position
//! - **Sampler** - Frame-throttled, surface-relative pointer metrics
//! - **Idle** - Pointer idle detection on the owner's timer registry
//! - **Input** - crossterm bridge for terminal hosts

pub mod idle;
pub mod input;
pub mod pointer;
pub mod sampler;

pub use idle::IdleTracker;
pub use pointer::{PointerAction, PointerEvent};
pub use sampler::PointerSampler;
