//! Pointer idle detection.
//!
//! Every pointer sample counts as activity. Activity leaves the idle state
//! immediately; the idle state is entered once no activity has been seen
//! for the threshold. The check rides on the owner's [`TimerRegistry`]
//! under [`TimerKey::PointerIdle`], so tearing down the registry also tears
//! down idle detection.

use std::cell::Cell;
use std::rc::Rc;

use crate::engine::clock;
use crate::engine::timers::{TimerKey, TimerRegistry};

#[derive(Clone)]
pub struct IdleTracker {
    timers: TimerRegistry,
    threshold_ms: f64,
    last_move_at: Rc<Cell<f64>>,
    idle: Rc<Cell<bool>>,
}

impl IdleTracker {
    pub fn new(timers: TimerRegistry, threshold_ms: f64) -> Self {
        Self {
            timers,
            threshold_ms,
            last_move_at: Rc::new(Cell::new(clock::now())),
            idle: Rc::new(Cell::new(false)),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.idle.get()
    }

    pub fn last_move_at(&self) -> f64 {
        self.last_move_at.get()
    }

    /// Record pointer activity.
    ///
    /// `on_exit_idle` runs synchronously if the pointer was idle;
    /// `on_enter_idle` runs later, from the idle timer, if no further
    /// activity arrives within the threshold.
    pub fn record_activity<X, E>(&self, on_exit_idle: X, on_enter_idle: E)
    where
        X: FnOnce(),
        E: FnOnce() + 'static,
    {
        self.last_move_at.set(clock::now());

        if self.idle.get() {
            self.idle.set(false);
            self.timers.clear(TimerKey::PointerIdle);
            log::debug!("pointer left idle");
            on_exit_idle();
        }

        let threshold = self.threshold_ms;
        let last_move_at = self.last_move_at.clone();
        let idle = self.idle.clone();
        self.timers.set(TimerKey::PointerIdle, threshold, move || {
            let since = clock::now() - last_move_at.get();
            if since >= threshold && !idle.get() {
                idle.set(true);
                log::debug!("pointer idle after {since:.0}ms");
                on_enter_idle();
            }
        });
    }

    /// Forget idle state and cancel the pending check.
    pub fn reset(&self) {
        self.timers.clear(TimerKey::PointerIdle);
        self.idle.set(false);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::clock::{advance_by, now, reset_clock};

    fn setup() -> (TimerRegistry, IdleTracker) {
        reset_clock();
        let timers = TimerRegistry::new();
        let tracker = IdleTracker::new(timers.clone(), 5000.0);
        (timers, tracker)
    }

    #[test]
    fn test_updates_last_move_at() {
        let (_timers, tracker) = setup();
        advance_by(1234.0);
        tracker.record_activity(|| {}, || {});
        assert_eq!(tracker.last_move_at(), now());
    }

    #[test]
    fn test_arms_idle_timer() {
        let (timers, tracker) = setup();
        tracker.record_activity(|| {}, || {});
        assert!(timers.has(TimerKey::PointerIdle));
    }

    #[test]
    fn test_enters_idle_after_threshold() {
        let (_timers, tracker) = setup();
        let entered = Rc::new(Cell::new(0));
        let e = entered.clone();

        tracker.record_activity(|| {}, move || e.set(e.get() + 1));
        advance_by(4999.0);
        assert!(!tracker.is_idle());

        advance_by(1.0);
        assert!(tracker.is_idle());
        assert_eq!(entered.get(), 1);
    }

    #[test]
    fn test_activity_before_threshold_postpones_idle() {
        let (_timers, tracker) = setup();
        let entered = Rc::new(Cell::new(0));

        let e = entered.clone();
        tracker.record_activity(|| {}, move || e.set(e.get() + 1));
        advance_by(3000.0);

        let e = entered.clone();
        tracker.record_activity(|| {}, move || e.set(e.get() + 1));
        advance_by(3000.0);
        assert!(!tracker.is_idle());
        assert_eq!(entered.get(), 0);

        advance_by(2000.0);
        assert!(tracker.is_idle());
        assert_eq!(entered.get(), 1);
    }

    #[test]
    fn test_exit_idle_calls_hook() {
        let (_timers, tracker) = setup();
        tracker.record_activity(|| {}, || {});
        advance_by(5000.0);
        assert!(tracker.is_idle());

        let exited = Rc::new(Cell::new(false));
        let x = exited.clone();
        tracker.record_activity(move || x.set(true), || {});
        assert!(exited.get());
        assert!(!tracker.is_idle());
    }

    #[test]
    fn test_no_exit_hook_when_not_idle() {
        let (_timers, tracker) = setup();
        let exited = Rc::new(Cell::new(false));
        let x = exited.clone();
        tracker.record_activity(move || x.set(true), || {});
        assert!(!exited.get());
    }

    #[test]
    fn test_reset() {
        let (timers, tracker) = setup();
        tracker.record_activity(|| {}, || {});
        advance_by(5000.0);
        assert!(tracker.is_idle());

        tracker.record_activity(|| {}, || {});
        tracker.reset();
        assert!(!tracker.is_idle());
        assert!(!timers.has(TimerKey::PointerIdle));
    }
}
