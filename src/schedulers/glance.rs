//! Glance Scheduler - Periodic re-centering of the gaze
//!
//! # Pattern
//!
//! - Arming (`start`/`reschedule`) is skipped entirely under reduced motion,
//!   on touch devices, or while the pointer is very close
//! - The delay bucket is picked at arm time: idle, then close, then far
//! - On fire, if not poked and not already glancing: remember the gaze
//!   (unless a position is already remembered), snap to center, render, and
//!   hold for a random duration under `glanceHold`
//! - Hold expiry clears the glancing flag and restores the remembered gaze
//! - Either way the next glance is armed
//!
//! The scheduler never touches the controller directly; it goes through the
//! [`GlanceHost`] capability trait.

use std::rc::Weak;

use crate::config::RandomDelay;
use crate::constants::*;
use crate::engine::timers::{TimerKey, TimerRegistry};
use crate::types::EyePosition;

// =============================================================================
// HOST CAPABILITIES
// =============================================================================

pub trait GlanceHost {
    fn reduced_motion(&self) -> bool;
    fn is_touch_device(&self) -> bool;
    fn is_very_close(&self) -> bool;
    fn is_poked(&self) -> bool;
    fn is_glancing(&self) -> bool;
    fn is_cursor_idle(&self) -> bool;
    fn is_cursor_close(&self) -> bool;

    fn position(&self) -> EyePosition;
    fn set_position(&self, position: EyePosition);
    fn last_pointer_position(&self) -> Option<EyePosition>;
    fn set_last_pointer_position(&self, position: Option<EyePosition>);
    fn set_glancing(&self, glancing: bool);
    fn request_render(&self);
}

/// Delay ranges, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlanceDelays {
    pub duration_min: f64,
    pub duration_max: f64,
    pub idle_min: f64,
    pub idle_max: f64,
    pub close_min: f64,
    pub close_max: f64,
    pub far_min: f64,
    pub far_max: f64,
}

impl Default for GlanceDelays {
    fn default() -> Self {
        Self {
            duration_min: GLANCE_DURATION_MIN_MS,
            duration_max: GLANCE_DURATION_MAX_MS,
            idle_min: GLANCE_DELAY_IDLE_MIN_MS,
            idle_max: GLANCE_DELAY_IDLE_MAX_MS,
            close_min: GLANCE_DELAY_CLOSE_MIN_MS,
            close_max: GLANCE_DELAY_CLOSE_MAX_MS,
            far_min: GLANCE_DELAY_FAR_MIN_MS,
            far_max: GLANCE_DELAY_FAR_MAX_MS,
        }
    }
}

// =============================================================================
// SCHEDULER
// =============================================================================

#[derive(Clone)]
pub struct GlanceScheduler {
    timers: TimerRegistry,
    host: Weak<dyn GlanceHost>,
    random_delay: RandomDelay,
    delays: GlanceDelays,
}

impl GlanceScheduler {
    pub fn new(timers: TimerRegistry, host: Weak<dyn GlanceHost>, random_delay: RandomDelay) -> Self {
        Self {
            timers,
            host,
            random_delay,
            delays: GlanceDelays::default(),
        }
    }

    pub fn with_delays(mut self, delays: GlanceDelays) -> Self {
        self.delays = delays;
        self
    }

    pub fn start(&self) {
        self.schedule_next();
    }

    /// Cancel the pending glance and re-arm with a freshly picked bucket.
    /// An in-progress hold is left alone.
    pub fn reschedule(&self) {
        self.timers.clear(TimerKey::RandomGlance);
        self.schedule_next();
    }

    pub fn stop(&self) {
        self.timers.clear(TimerKey::RandomGlance);
        self.timers.clear(TimerKey::GlanceHold);
    }

    fn schedule_next(&self) {
        let Some(host) = self.host.upgrade() else {
            return;
        };
        if host.reduced_motion() || host.is_touch_device() || host.is_very_close() {
            return;
        }

        let delay = self.next_delay(host.as_ref());
        drop(host);

        let scheduler = self.clone();
        self.timers.set(TimerKey::RandomGlance, delay, move || {
            let Some(host) = scheduler.host.upgrade() else {
                return;
            };
            if !host.is_poked() && !host.is_glancing() {
                scheduler.glance_at_center(host.as_ref());
            }
            drop(host);
            scheduler.schedule_next();
        });
    }

    fn next_delay(&self, host: &dyn GlanceHost) -> f64 {
        let d = &self.delays;
        if host.is_cursor_idle() {
            (self.random_delay)(d.idle_min, d.idle_max)
        } else if host.is_cursor_close() {
            (self.random_delay)(d.close_min, d.close_max)
        } else {
            (self.random_delay)(d.far_min, d.far_max)
        }
    }

    fn glance_at_center(&self, host: &dyn GlanceHost) {
        if host.is_glancing() || host.reduced_motion() || host.is_touch_device() {
            return;
        }

        // Keep the first saved gaze across a run of glances.
        if host.last_pointer_position().is_none() {
            host.set_last_pointer_position(Some(host.position()));
        }

        host.set_glancing(true);
        host.set_position(EyePosition::CENTER);
        host.request_render();
        log::debug!("glance started");

        let duration = (self.random_delay)(self.delays.duration_min, self.delays.duration_max);
        let weak = self.host.clone();
        self.timers.set(TimerKey::GlanceHold, duration, move || {
            let Some(host) = weak.upgrade() else {
                return;
            };
            host.set_glancing(false);
            if let Some(back) = host.last_pointer_position() {
                host.set_position(back);
                host.request_render();
            }
            log::debug!("glance ended");
        });
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::min_delay;
    use crate::engine::clock::{advance_by, reset_clock};
    use std::cell::Cell;
    use std::rc::Rc;

    #[derive(Default)]
    struct TestHost {
        reduced_motion: Cell<bool>,
        touch: Cell<bool>,
        very_close: Cell<bool>,
        poked: Cell<bool>,
        glancing: Cell<bool>,
        idle: Cell<bool>,
        close: Cell<bool>,
        position: Cell<EyePosition>,
        last_pointer: Cell<Option<EyePosition>>,
        renders: Cell<u32>,
    }

    impl GlanceHost for TestHost {
        fn reduced_motion(&self) -> bool {
            self.reduced_motion.get()
        }
        fn is_touch_device(&self) -> bool {
            self.touch.get()
        }
        fn is_very_close(&self) -> bool {
            self.very_close.get()
        }
        fn is_poked(&self) -> bool {
            self.poked.get()
        }
        fn is_glancing(&self) -> bool {
            self.glancing.get()
        }
        fn is_cursor_idle(&self) -> bool {
            self.idle.get()
        }
        fn is_cursor_close(&self) -> bool {
            self.close.get()
        }
        fn position(&self) -> EyePosition {
            self.position.get()
        }
        fn set_position(&self, position: EyePosition) {
            self.position.set(position);
        }
        fn last_pointer_position(&self) -> Option<EyePosition> {
            self.last_pointer.get()
        }
        fn set_last_pointer_position(&self, position: Option<EyePosition>) {
            self.last_pointer.set(position);
        }
        fn set_glancing(&self, glancing: bool) {
            self.glancing.set(glancing);
        }
        fn request_render(&self) {
            self.renders.set(self.renders.get() + 1);
        }
    }

    fn setup() -> (TimerRegistry, Rc<TestHost>, GlanceScheduler) {
        reset_clock();
        let timers = TimerRegistry::new();
        let host = Rc::new(TestHost::default());
        let weak: Weak<dyn GlanceHost> = Rc::downgrade(&host) as Weak<dyn GlanceHost>;
        let scheduler = GlanceScheduler::new(timers.clone(), weak, min_delay());
        (timers, host, scheduler)
    }

    #[test]
    fn test_start_arms_timer() {
        let (timers, _host, scheduler) = setup();
        scheduler.start();
        assert!(timers.has(TimerKey::RandomGlance));
    }

    #[test]
    fn test_no_timer_with_reduced_motion() {
        let (timers, host, scheduler) = setup();
        host.reduced_motion.set(true);
        scheduler.start();
        assert!(!timers.has(TimerKey::RandomGlance));
    }

    #[test]
    fn test_no_timer_on_touch_device() {
        let (timers, host, scheduler) = setup();
        host.touch.set(true);
        scheduler.start();
        assert!(!timers.has(TimerKey::RandomGlance));
    }

    #[test]
    fn test_no_timer_when_very_close() {
        let (timers, host, scheduler) = setup();
        host.very_close.set(true);
        scheduler.reschedule();
        assert!(!timers.has(TimerKey::RandomGlance));
    }

    #[test]
    fn test_reschedule_cancels_when_very_close() {
        let (timers, host, scheduler) = setup();
        scheduler.start();
        host.very_close.set(true);
        scheduler.reschedule();
        assert!(!timers.has(TimerKey::RandomGlance));
    }

    #[test]
    fn test_far_bucket_delay() {
        let (_timers, host, scheduler) = setup();
        host.position.set(EyePosition::new(5.0, 5.0));
        scheduler.start();

        advance_by(GLANCE_DELAY_FAR_MIN_MS - 1.0);
        assert!(!host.glancing.get());
        advance_by(1.0);
        assert!(host.glancing.get());
    }

    #[test]
    fn test_idle_bucket_wins_over_close() {
        let (_timers, host, scheduler) = setup();
        host.idle.set(true);
        host.close.set(true);
        scheduler.start();

        advance_by(GLANCE_DELAY_IDLE_MIN_MS);
        assert!(host.glancing.get());
    }

    #[test]
    fn test_close_bucket_delay() {
        let (_timers, host, scheduler) = setup();
        host.close.set(true);
        scheduler.start();

        advance_by(GLANCE_DELAY_CLOSE_MIN_MS);
        assert!(host.glancing.get());
    }

    #[test]
    fn test_glance_centers_then_restores() {
        let (timers, host, scheduler) = setup();
        host.close.set(true);
        host.position.set(EyePosition::new(8.0, -4.0));
        scheduler.start();

        advance_by(GLANCE_DELAY_CLOSE_MIN_MS);
        assert_eq!(host.position.get(), EyePosition::CENTER);
        assert_eq!(host.last_pointer.get(), Some(EyePosition::new(8.0, -4.0)));
        assert!(timers.has(TimerKey::GlanceHold));
        assert!(timers.has(TimerKey::RandomGlance));
        assert_eq!(host.renders.get(), 1);

        advance_by(GLANCE_DURATION_MIN_MS);
        assert!(!host.glancing.get());
        assert_eq!(host.position.get(), EyePosition::new(8.0, -4.0));
        assert_eq!(host.renders.get(), 2);
    }

    #[test]
    fn test_existing_last_position_not_clobbered() {
        let (_timers, host, scheduler) = setup();
        host.close.set(true);
        host.position.set(EyePosition::new(1.0, 1.0));
        host.last_pointer.set(Some(EyePosition::new(9.0, 9.0)));
        scheduler.start();

        advance_by(GLANCE_DELAY_CLOSE_MIN_MS);
        assert_eq!(host.last_pointer.get(), Some(EyePosition::new(9.0, 9.0)));

        advance_by(GLANCE_DURATION_MIN_MS);
        assert_eq!(host.position.get(), EyePosition::new(9.0, 9.0));
    }

    #[test]
    fn test_poked_skips_glance_but_rearms() {
        let (timers, host, scheduler) = setup();
        host.poked.set(true);
        scheduler.start();

        advance_by(GLANCE_DELAY_FAR_MIN_MS);
        assert!(!host.glancing.get());
        assert!(!timers.has(TimerKey::GlanceHold));
        assert!(timers.has(TimerKey::RandomGlance));
    }

    #[test]
    fn test_custom_delays() {
        let (timers, host, scheduler) = setup();
        let scheduler = scheduler.with_delays(GlanceDelays {
            duration_min: 50.0,
            duration_max: 60.0,
            far_min: 300.0,
            far_max: 400.0,
            ..GlanceDelays::default()
        });
        host.position.set(EyePosition::new(3.0, 2.0));
        scheduler.start();

        advance_by(299.0);
        assert!(!host.glancing.get());
        advance_by(1.0);
        assert!(host.glancing.get());
        assert!(timers.has(TimerKey::GlanceHold));

        advance_by(50.0);
        assert!(!host.glancing.get());
        assert_eq!(host.position.get(), EyePosition::new(3.0, 2.0));
    }

    #[test]
    fn test_stop_cancels_both_timers() {
        let (timers, host, scheduler) = setup();
        host.close.set(true);
        scheduler.start();
        advance_by(GLANCE_DELAY_CLOSE_MIN_MS);
        assert!(timers.has(TimerKey::GlanceHold));

        scheduler.stop();
        assert!(!timers.has(TimerKey::RandomGlance));
        assert!(!timers.has(TimerKey::GlanceHold));
    }
}
