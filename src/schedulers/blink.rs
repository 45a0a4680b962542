//! Blink Scheduler - Random-interval blink loop
//!
//! Arms `randomBlink` with a delay drawn from `[min, max]`. When it fires the
//! target blinks if it is eligible, and the loop re-arms regardless. The loop
//! only ends with [`BlinkScheduler::stop`] (or when the target is dropped).

use std::rc::Weak;

use crate::config::RandomDelay;
use crate::constants::{BLINK_DELAY_MAX_MS, BLINK_DELAY_MIN_MS};
use crate::engine::timers::{TimerKey, TimerRegistry};

/// What the blink loop needs from its owner.
pub trait BlinkTarget {
    /// Eligible right now: not poked, not already blinking, eyelid open.
    fn should_blink(&self) -> bool;
    fn do_blink(&self);
}

#[derive(Clone)]
pub struct BlinkScheduler {
    timers: TimerRegistry,
    target: Weak<dyn BlinkTarget>,
    random_delay: RandomDelay,
    min_ms: f64,
    max_ms: f64,
}

impl BlinkScheduler {
    pub fn new(timers: TimerRegistry, target: Weak<dyn BlinkTarget>, random_delay: RandomDelay) -> Self {
        Self {
            timers,
            target,
            random_delay,
            min_ms: BLINK_DELAY_MIN_MS,
            max_ms: BLINK_DELAY_MAX_MS,
        }
    }

    /// Override the delay range.
    pub fn with_range(mut self, min_ms: f64, max_ms: f64) -> Self {
        self.min_ms = min_ms;
        self.max_ms = max_ms;
        self
    }

    pub fn start(&self) {
        self.schedule_next();
    }

    pub fn stop(&self) {
        self.timers.clear(TimerKey::RandomBlink);
    }

    fn schedule_next(&self) {
        let delay = (self.random_delay)(self.min_ms, self.max_ms);
        let scheduler = self.clone();
        self.timers.set(TimerKey::RandomBlink, delay, move || {
            let Some(target) = scheduler.target.upgrade() else {
                return;
            };
            if target.should_blink() {
                target.do_blink();
            }
            scheduler.schedule_next();
        });
    }
}
