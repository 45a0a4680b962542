//! Pointer Module - Global pointer signal source
//!
//! The window-level pointer stream every mascot listens to. Hosts feed raw
//! events in with [`dispatch`]; subscribers register with
//! [`on_pointer_move`] / [`on_pointer_down`] and get a cleanup closure back.
//!
//! # API
//!
//! - `last_event` - Get last pointer event
//! - `pointer_x`, `pointer_y` - Get pointer position
//! - `is_pointer_down` - Get button state
//! - `dispatch(event)` - Dispatch pointer event
//! - `on_pointer_move(fn)` - Global move handler
//! - `on_pointer_down(fn)` - Global press handler
//!
//! # Example
//!
//! ```ignore
//! use spark_mascot::state::pointer;
//!
//! let cleanup = pointer::on_pointer_move(|event| {
//!     println!("Pointer at ({}, {})", event.x, event.y);
//! });
//!
//! pointer::dispatch(pointer::PointerEvent::move_to(120.0, 48.0));
//! cleanup();
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{Signal, signal};

// =============================================================================
// TYPES
// =============================================================================

/// Pointer action type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Move,
    Down,
    Up,
}

/// Pointer event in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub action: PointerAction,
    pub x: f64,
    pub y: f64,
}

impl PointerEvent {
    pub fn new(action: PointerAction, x: f64, y: f64) -> Self {
        Self { action, x, y }
    }

    /// Create a pointer move event
    pub fn move_to(x: f64, y: f64) -> Self {
        Self::new(PointerAction::Move, x, y)
    }

    /// Create a pointer down event
    pub fn down(x: f64, y: f64) -> Self {
        Self::new(PointerAction::Down, x, y)
    }

    /// Create a pointer up event
    pub fn up(x: f64, y: f64) -> Self {
        Self::new(PointerAction::Up, x, y)
    }
}

// =============================================================================
// REACTIVE STATE
// =============================================================================

thread_local! {
    static LAST_EVENT: Signal<Option<PointerEvent>> = signal(None);
    static POINTER_X: Signal<f64> = signal(0.0);
    static POINTER_Y: Signal<f64> = signal(0.0);
    static IS_POINTER_DOWN: Signal<bool> = signal(false);
}

/// Get the last pointer event
pub fn last_event() -> Option<PointerEvent> {
    LAST_EVENT.with(|s| s.get())
}

/// Get current pointer X position
pub fn pointer_x() -> f64 {
    POINTER_X.with(|s| s.get())
}

/// Get current pointer Y position
pub fn pointer_y() -> f64 {
    POINTER_Y.with(|s| s.get())
}

/// Check if the pointer button is currently down
pub fn is_pointer_down() -> bool {
    IS_POINTER_DOWN.with(|s| s.get())
}

// =============================================================================
// HANDLER REGISTRY
// =============================================================================

/// Handler for pointer events.
pub type PointerHandler = Rc<dyn Fn(&PointerEvent)>;

struct HandlerRegistry {
    move_handlers: Vec<(usize, PointerHandler)>,
    down_handlers: Vec<(usize, PointerHandler)>,
    next_id: usize,
}

impl HandlerRegistry {
    fn new() -> Self {
        Self {
            move_handlers: Vec::new(),
            down_handlers: Vec::new(),
            next_id: 0,
        }
    }

    fn next_id(&mut self) -> usize {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

thread_local! {
    static REGISTRY: RefCell<HandlerRegistry> = RefCell::new(HandlerRegistry::new());
}

// =============================================================================
// PUBLIC API - REGISTRATION
// =============================================================================

/// Register a global pointer move handler. Returns cleanup function.
pub fn on_pointer_move<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&PointerEvent) + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.move_handlers.push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            reg.move_handlers.retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Register a global pointer down handler. Returns cleanup function.
pub fn on_pointer_down<F>(handler: F) -> impl FnOnce()
where
    F: Fn(&PointerEvent) + 'static,
{
    let id = REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        let id = reg.next_id();
        reg.down_handlers.push((id, Rc::new(handler)));
        id
    });

    move || {
        REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            reg.down_handlers.retain(|(handler_id, _)| *handler_id != id);
        });
    }
}

/// Number of registered move handlers.
pub fn move_handler_count() -> usize {
    REGISTRY.with(|reg| reg.borrow().move_handlers.len())
}

// =============================================================================
// DISPATCH
// =============================================================================

/// Dispatch a pointer event to all registered handlers.
///
/// Handlers are snapshotted first, so a handler may unsubscribe itself (or
/// anyone else) while the event is being delivered.
pub fn dispatch(event: PointerEvent) {
    LAST_EVENT.with(|s| s.set(Some(event)));
    POINTER_X.with(|s| s.set(event.x));
    POINTER_Y.with(|s| s.set(event.y));

    match event.action {
        PointerAction::Down => {
            IS_POINTER_DOWN.with(|s| s.set(true));
        }
        PointerAction::Up => {
            IS_POINTER_DOWN.with(|s| s.set(false));
        }
        PointerAction::Move => {}
    }

    let handlers: Vec<PointerHandler> = REGISTRY.with(|reg| {
        let reg = reg.borrow();
        let list = match event.action {
            PointerAction::Move => &reg.move_handlers,
            PointerAction::Down => &reg.down_handlers,
            PointerAction::Up => return Vec::new(),
        };
        list.iter().map(|(_, handler)| handler.clone()).collect()
    });

    for handler in handlers {
        handler(&event);
    }
}

// =============================================================================
// CLEANUP
// =============================================================================

/// Clear all state and handlers.
pub fn cleanup() {
    REGISTRY.with(|reg| {
        let mut reg = reg.borrow_mut();
        reg.move_handlers.clear();
        reg.down_handlers.clear();
    });

    LAST_EVENT.with(|s| s.set(None));
    POINTER_X.with(|s| s.set(0.0));
    POINTER_Y.with(|s| s.set(0.0));
    IS_POINTER_DOWN.with(|s| s.set(false));
}

/// Reset pointer state (for testing)
pub fn reset_pointer_state() {
    cleanup();
    REGISTRY.with(|reg| {
        reg.borrow_mut().next_id = 0;
    });
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    fn setup() {
        reset_pointer_state();
    }

    #[test]
    fn test_dispatch_updates_state() {
        setup();

        dispatch(PointerEvent::move_to(10.0, 20.0));
        assert_eq!(pointer_x(), 10.0);
        assert_eq!(pointer_y(), 20.0);
        assert!(!is_pointer_down());

        dispatch(PointerEvent::down(15.0, 25.0));
        assert!(is_pointer_down());
        assert_eq!(last_event(), Some(PointerEvent::down(15.0, 25.0)));

        dispatch(PointerEvent::up(15.0, 25.0));
        assert!(!is_pointer_down());
    }

    #[test]
    fn test_move_handler_cleanup() {
        setup();

        let count = Rc::new(Cell::new(0));
        let count_clone = count.clone();
        let cleanup = on_pointer_move(move |_| count_clone.set(count_clone.get() + 1));

        dispatch(PointerEvent::move_to(1.0, 1.0));
        dispatch(PointerEvent::down(1.0, 1.0)); // not a move
        assert_eq!(count.get(), 1);

        cleanup();
        dispatch(PointerEvent::move_to(2.0, 2.0));
        assert_eq!(count.get(), 1);
        assert_eq!(move_handler_count(), 0);
    }

    #[test]
    fn test_down_handler() {
        setup();

        let pressed_at = Rc::new(Cell::new((0.0, 0.0)));
        let pressed_clone = pressed_at.clone();
        let _cleanup = on_pointer_down(move |e| pressed_clone.set((e.x, e.y)));

        dispatch(PointerEvent::move_to(3.0, 4.0));
        assert_eq!(pressed_at.get(), (0.0, 0.0));

        dispatch(PointerEvent::down(5.0, 6.0));
        assert_eq!(pressed_at.get(), (5.0, 6.0));
    }

    #[test]
    fn test_handler_may_unsubscribe_during_dispatch() {
        setup();

        let slot: Rc<RefCell<Option<Box<dyn FnOnce()>>>> = Rc::new(RefCell::new(None));
        let count = Rc::new(Cell::new(0));

        let slot_clone = slot.clone();
        let count_clone = count.clone();
        let cleanup = on_pointer_move(move |_| {
            count_clone.set(count_clone.get() + 1);
            if let Some(cleanup) = slot_clone.borrow_mut().take() {
                cleanup();
            }
        });
        *slot.borrow_mut() = Some(Box::new(cleanup));

        dispatch(PointerEvent::move_to(1.0, 1.0));
        dispatch(PointerEvent::move_to(2.0, 2.0));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_cleanup_clears_everything() {
        setup();

        let _c = on_pointer_move(|_| {});
        let _d = on_pointer_down(|_| {});
        dispatch(PointerEvent::down(9.0, 9.0));

        cleanup();
        assert_eq!(move_handler_count(), 0);
        assert_eq!(last_event(), None);
        assert!(!is_pointer_down());
        assert_eq!(pointer_x(), 0.0);
    }
}
