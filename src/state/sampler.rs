//! Pointer Sampler - Frame-throttled pointer metrics
//!
//! Listens to the global pointer stream and turns raw positions into
//! center-relative [`PointerMetrics`] for one surface, at most once per
//! animation frame.
//!
//! # Pattern
//!
//! - Every accepted event overwrites a single "latest event" slot
//! - The first event after a tick requests one animation frame; later events
//!   in the same frame only overwrite the slot
//! - At tick time the enabled predicate and the surface are re-checked (they
//!   may have changed since the event), then metrics are computed against
//!   the surface's *current* bounds
//! - Events arriving while disabled or without a surface are dropped, not
//!   queued
//!
//! # Example
//!
//! ```ignore
//! let sampler = PointerSampler::start(
//!     move || surface.upgrade().map(|s| s.bounds()),
//!     move || tracking.get(),
//!     move |metrics| println!("{:.1} away", metrics.distance),
//! );
//! // ...
//! sampler.stop();
//! ```

use std::cell::Cell;
use std::rc::Rc;

use super::pointer::{self, PointerEvent};
use crate::engine::clock::{self, FrameHandle};
use crate::types::{PointerMetrics, Rect};

// =============================================================================
// SAMPLER STATE
// =============================================================================

struct SamplerState {
    surface: Box<dyn Fn() -> Option<Rect>>,
    enabled: Box<dyn Fn() -> bool>,
    on_metrics: Box<dyn Fn(PointerMetrics)>,
    latest: Cell<Option<(f64, f64)>>,
    frame: Cell<Option<FrameHandle>>,
    samples: Cell<u64>,
}

impl SamplerState {
    fn accept(self: &Rc<Self>, event: &PointerEvent) {
        if !(self.enabled)() || (self.surface)().is_none() {
            return;
        }

        self.latest.set(Some((event.x, event.y)));

        if self.frame.get().is_some() {
            return;
        }

        let state = Rc::downgrade(self);
        let handle = clock::request_animation_frame(move |_| {
            if let Some(state) = state.upgrade() {
                state.tick();
            }
        });
        self.frame.set(Some(handle));
    }

    fn tick(&self) {
        self.frame.set(None);

        let Some((x, y)) = self.latest.get() else {
            return;
        };
        let Some(bounds) = (self.surface)() else {
            return;
        };
        if !(self.enabled)() {
            return;
        }

        let metrics = PointerMetrics::measure(x, y, &bounds);
        self.samples.set(self.samples.get() + 1);
        log::trace!(
            "pointer sample dx={:.1} dy={:.1} d={:.1}",
            metrics.delta_x,
            metrics.delta_y,
            metrics.distance
        );
        (self.on_metrics)(metrics);
    }
}

// =============================================================================
// SAMPLER HANDLE
// =============================================================================

/// Live subscription to the pointer stream. Stop it (or drop it) to
/// unsubscribe and discard any pending sample.
pub struct PointerSampler {
    state: Rc<SamplerState>,
    unsubscribe: Option<Box<dyn FnOnce()>>,
}

impl PointerSampler {
    /// Subscribe to the global pointer stream.
    ///
    /// * `surface` - current bounds of the target, `None` when it is gone
    /// * `enabled` - re-evaluated on every event and every tick
    /// * `on_metrics` - called at most once per frame
    pub fn start<S, E, M>(surface: S, enabled: E, on_metrics: M) -> Self
    where
        S: Fn() -> Option<Rect> + 'static,
        E: Fn() -> bool + 'static,
        M: Fn(PointerMetrics) + 'static,
    {
        let state = Rc::new(SamplerState {
            surface: Box::new(surface),
            enabled: Box::new(enabled),
            on_metrics: Box::new(on_metrics),
            latest: Cell::new(None),
            frame: Cell::new(None),
            samples: Cell::new(0),
        });

        let listener = state.clone();
        let unsubscribe = pointer::on_pointer_move(move |event| listener.accept(event));

        Self {
            state,
            unsubscribe: Some(Box::new(unsubscribe)),
        }
    }

    /// Whether a frame is pending for the latest event.
    pub fn has_pending_sample(&self) -> bool {
        self.state.frame.get().is_some()
    }

    /// Number of metrics delivered so far.
    pub fn samples(&self) -> u64 {
        self.state.samples.get()
    }

    /// Unsubscribe and drop any pending sample. Safe to call twice.
    pub fn stop(&mut self) {
        if let Some(unsubscribe) = self.unsubscribe.take() {
            unsubscribe();
        }
        if let Some(frame) = self.state.frame.take() {
            clock::cancel_animation_frame(frame);
        }
        self.state.latest.set(None);
    }

    pub fn is_running(&self) -> bool {
        self.unsubscribe.is_some()
    }
}

impl Drop for PointerSampler {
    fn drop(&mut self) {
        self.stop();
    }
}

// =============================================================================
// TESTS
// =============================================================================
