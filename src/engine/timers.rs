//! Timer Registry - Keyed, cancelable single-shot timers.
//!
//! Each mascot owns one registry. At most one timer is armed per key:
//! arming a key cancels whatever was armed under it. When a timer fires its
//! key is evicted *before* the callback runs, so the callback may re-arm the
//! same key.
//!
//! The registry is a cheap handle (`Rc` inside); clones share the same
//! entries, which is how schedulers and the controller arm timers in one
//! place and tear them all down with a single [`TimerRegistry::clear_all`].

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use super::clock::{self, TimerHandle};

// =============================================================================
// Keys
// =============================================================================

/// The fixed set of timer slots used by the mascot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKey {
    RandomBlink,
    RandomGlance,
    GlanceHold,
    Poke,
    Blink,
    PointerIdle,
}

impl TimerKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::RandomBlink => "randomBlink",
            Self::RandomGlance => "randomGlance",
            Self::GlanceHold => "glanceHold",
            Self::Poke => "poke",
            Self::Blink => "blink",
            Self::PointerIdle => "pointerIdle",
        }
    }
}

impl fmt::Display for TimerKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Registry
// =============================================================================

#[derive(Clone, Default)]
pub struct TimerRegistry {
    active: Rc<RefCell<HashMap<TimerKey, TimerHandle>>>,
}

impl TimerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm `callback` under `key` after `delay_ms`, replacing any timer
    /// already armed under that key.
    pub fn set<F>(&self, key: TimerKey, delay_ms: f64, callback: F)
    where
        F: FnOnce() + 'static,
    {
        self.clear(key);

        let active = Rc::downgrade(&self.active);
        let handle = clock::set_timeout(delay_ms, move || {
            // Registry gone means its owner is gone.
            let Some(active) = active.upgrade() else {
                return;
            };
            active.borrow_mut().remove(&key);
            callback();
        });

        log::trace!("timer {key} armed for {delay_ms:.0}ms");
        self.active.borrow_mut().insert(key, handle);
    }

    /// Cancel and evict the timer under `key`, if any.
    pub fn clear(&self, key: TimerKey) {
        let handle = self.active.borrow_mut().remove(&key);
        if let Some(handle) = handle {
            clock::clear_timeout(handle);
        }
    }

    /// Cancel every armed timer.
    pub fn clear_all(&self) {
        let handles: Vec<TimerHandle> = self.active.borrow_mut().drain().map(|(_, h)| h).collect();
        for handle in handles {
            clock::clear_timeout(handle);
        }
    }

    /// Whether a timer is currently armed under `key`.
    pub fn has(&self, key: TimerKey) -> bool {
        self.active.borrow().contains_key(&key)
    }

    /// Number of armed timers.
    pub fn len(&self) -> usize {
        self.active.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.borrow().is_empty()
    }
}

// =============================================================================
// Tests
// =============================================================================
