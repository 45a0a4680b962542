//! Clock - Single-threaded cooperative event loop
//!
//! Owns virtual time, single-shot timeouts and animation-frame requests for
//! the current thread. Nothing runs on its own: the host advances time and
//! every callback that comes due runs, one at a time, in order.
//!
//! # Pattern
//!
//! - Timeouts fire at `now + delay`, ties in arming order
//! - Frames tick on a fixed grid of [`FRAME_INTERVAL_MS`]; a request is
//!   serviced at the first grid point strictly after it was made, so a frame
//!   callback that requests another frame lands on the following tick
//! - Timers due at the same instant as a frame tick run first
//! - No loop borrow is held while a callback runs, so callbacks may arm and
//!   cancel freely
//!
//! # Example
//!
//! ```ignore
//! use spark_mascot::engine::clock;
//!
//! let handle = clock::set_timeout(400.0, || println!("fired"));
//! clock::advance_by(400.0); // prints "fired"
//!
//! // Real-time host loop
//! loop {
//!     clock::advance_to(start.elapsed().as_secs_f64() * 1000.0);
//! }
//! ```

use std::cell::RefCell;
use std::collections::BTreeMap;

/// Animation frame period (~60 fps).
pub const FRAME_INTERVAL_MS: f64 = 16.0;

// =============================================================================
// HANDLES
// =============================================================================

/// Handle of a pending timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

/// Handle of a pending animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(u64);

// =============================================================================
// LOOP STATE
// =============================================================================

struct PendingTimer {
    due: f64,
    callback: Box<dyn FnOnce()>,
}

struct PendingFrame {
    due: f64,
    callback: Box<dyn FnOnce(f64)>,
}

enum Task {
    Timer(Box<dyn FnOnce()>),
    Frame(Box<dyn FnOnce(f64)>, f64),
}

struct Clock {
    now: f64,
    next_id: u64,
    timers: BTreeMap<u64, PendingTimer>,
    frames: BTreeMap<u64, PendingFrame>,
}

impl Clock {
    fn new() -> Self {
        Self {
            now: 0.0,
            next_id: 0,
            timers: BTreeMap::new(),
            frames: BTreeMap::new(),
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn next_frame_boundary(&self) -> f64 {
        ((self.now / FRAME_INTERVAL_MS).floor() + 1.0) * FRAME_INTERVAL_MS
    }

    /// Earliest entry by due time; BTreeMap order breaks ties by id.
    fn earliest<T>(entries: &BTreeMap<u64, T>, due: impl Fn(&T) -> f64) -> Option<(u64, f64)> {
        let mut best: Option<(u64, f64)> = None;
        for (id, entry) in entries {
            let d = due(entry);
            match best {
                Some((_, best_due)) if d >= best_due => {}
                _ => best = Some((*id, d)),
            }
        }
        best
    }

    /// Remove and return the next task due at or before `target`.
    fn take_next(&mut self, target: f64) -> Option<Task> {
        let timer = Self::earliest(&self.timers, |t| t.due);
        let frame = Self::earliest(&self.frames, |f| f.due);

        let pick_timer = match (timer, frame) {
            (Some((_, t)), Some((_, f))) => t <= f,
            (Some(_), None) => true,
            (None, Some(_)) => false,
            (None, None) => return None,
        };

        if pick_timer {
            let (id, due) = timer?;
            if due > target {
                return None;
            }
            let entry = self.timers.remove(&id)?;
            self.now = self.now.max(due);
            Some(Task::Timer(entry.callback))
        } else {
            let (id, due) = frame?;
            if due > target {
                return None;
            }
            let entry = self.frames.remove(&id)?;
            self.now = self.now.max(due);
            Some(Task::Frame(entry.callback, self.now))
        }
    }
}

thread_local! {
    static CLOCK: RefCell<Clock> = RefCell::new(Clock::new());
}

// =============================================================================
// PUBLIC API
// =============================================================================

/// Current virtual time in milliseconds.
pub fn now() -> f64 {
    CLOCK.with(|c| c.borrow().now)
}

/// Arm a single-shot timeout. Negative or NaN delays fire on the next advance.
pub fn set_timeout<F>(delay_ms: f64, callback: F) -> TimerHandle
where
    F: FnOnce() + 'static,
{
    let delay = if delay_ms.is_finite() && delay_ms > 0.0 {
        delay_ms
    } else if delay_ms == f64::INFINITY {
        f64::MAX
    } else {
        0.0
    };

    CLOCK.with(|c| {
        let mut clock = c.borrow_mut();
        let id = clock.next_id();
        let due = clock.now + delay;
        clock.timers.insert(
            id,
            PendingTimer {
                due,
                callback: Box::new(callback),
            },
        );
        TimerHandle(id)
    })
}

/// Cancel a timeout. Unknown or already-fired handles are ignored.
pub fn clear_timeout(handle: TimerHandle) {
    // Dropped outside the borrow; a callback's captures may touch the clock.
    let removed = CLOCK.with(|c| c.borrow_mut().timers.remove(&handle.0));
    drop(removed);
}

/// Request a callback on the next frame tick. The callback receives the
/// tick timestamp.
pub fn request_animation_frame<F>(callback: F) -> FrameHandle
where
    F: FnOnce(f64) + 'static,
{
    CLOCK.with(|c| {
        let mut clock = c.borrow_mut();
        let id = clock.next_id();
        let due = clock.next_frame_boundary();
        clock.frames.insert(
            id,
            PendingFrame {
                due,
                callback: Box::new(callback),
            },
        );
        FrameHandle(id)
    })
}

/// Cancel a frame request. Unknown or already-run handles are ignored.
pub fn cancel_animation_frame(handle: FrameHandle) {
    let removed = CLOCK.with(|c| c.borrow_mut().frames.remove(&handle.0));
    drop(removed);
}

/// Advance time to `target`, running everything that comes due on the way.
/// Time never moves backwards.
pub fn advance_to(target: f64) {
    loop {
        let task = CLOCK.with(|c| c.borrow_mut().take_next(target));
        match task {
            Some(Task::Timer(callback)) => callback(),
            Some(Task::Frame(callback, timestamp)) => callback(timestamp),
            None => break,
        }
    }

    CLOCK.with(|c| {
        let mut clock = c.borrow_mut();
        if target > clock.now {
            clock.now = target;
        }
    });
}

/// Advance time by `ms`.
pub fn advance_by(ms: f64) {
    let target = now() + ms.max(0.0);
    advance_to(target);
}

/// Whether a timeout is still pending.
pub fn is_timer_pending(handle: TimerHandle) -> bool {
    CLOCK.with(|c| c.borrow().timers.contains_key(&handle.0))
}

/// Whether a frame request is still pending.
pub fn is_frame_pending(handle: FrameHandle) -> bool {
    CLOCK.with(|c| c.borrow().frames.contains_key(&handle.0))
}

/// Number of pending timeouts.
pub fn pending_timers() -> usize {
    CLOCK.with(|c| c.borrow().timers.len())
}

/// Number of pending frame requests.
pub fn pending_frames() -> usize {
    CLOCK.with(|c| c.borrow().frames.len())
}

/// Drop every pending callback and rewind time to zero (for testing).
pub fn reset_clock() {
    // Move the callbacks out before dropping them; their destructors may
    // touch the clock.
    let drained = CLOCK.with(|c| std::mem::replace(&mut *c.borrow_mut(), Clock::new()));
    drop(drained);
}

// =============================================================================
// TESTS
// =============================================================================
