//! Input Module - Terminal event conversion and polling
//!
//! Bridges crossterm's event system with the global pointer source so a
//! terminal host can drive a mascot. Terminal cells are scaled into virtual
//! pixels, which keeps the distance thresholds meaningful.
//!
//! # API
//!
//! - `convert_mouse_event` - crossterm MouseEvent to PointerEvent
//! - `convert_key_event` - crossterm KeyEvent to KeyPress
//! - `poll_event` - Non-blocking event check with timeout
//! - `route_event` - Dispatch pointer events to the pointer source
//! - `enable_mouse` / `disable_mouse` - Control mouse capture
//!
//! # Example
//!
//! ```ignore
//! use spark_mascot::state::input::{CellScale, poll_event, route_event};
//! use std::time::Duration;
//!
//! loop {
//!     if let Some(event) = poll_event(Duration::from_millis(16), CellScale::default())? {
//!         route_event(&event);
//!     }
//! }
//! ```

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode,
    KeyEvent as CrosstermKeyEvent, KeyEventKind, KeyModifiers, MouseEvent as CrosstermMouseEvent,
    MouseEventKind, poll, read,
};
use crossterm::execute;
use std::io::stdout;
use std::time::Duration;

use super::pointer::{self, PointerEvent};

// =============================================================================
// CELL SCALE
// =============================================================================

/// Virtual pixels per terminal cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellScale {
    pub x: f64,
    pub y: f64,
}

impl Default for CellScale {
    fn default() -> Self {
        // Typical cell aspect is about 1:2.
        Self { x: 8.0, y: 16.0 }
    }
}

impl CellScale {
    /// Center of cell `(column, row)` in virtual pixels.
    pub fn to_pixels(&self, column: u16, row: u16) -> (f64, f64) {
        (
            (f64::from(column) + 0.5) * self.x,
            (f64::from(row) + 0.5) * self.y,
        )
    }
}

// =============================================================================
// INPUT EVENT ENUM
// =============================================================================

/// A key press, reduced to what a host needs for commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Pointer(PointerEvent),
    Key(KeyPress),
    /// Terminal resize (columns, rows)
    Resize(u16, u16),
    None,
}

// =============================================================================
// CONVERSION
// =============================================================================

/// Convert a crossterm mouse event. Scrolls have no pointer meaning.
pub fn convert_mouse_event(event: CrosstermMouseEvent, scale: CellScale) -> Option<PointerEvent> {
    let (x, y) = scale.to_pixels(event.column, event.row);
    match event.kind {
        MouseEventKind::Moved | MouseEventKind::Drag(_) => Some(PointerEvent::move_to(x, y)),
        MouseEventKind::Down(_) => Some(PointerEvent::down(x, y)),
        MouseEventKind::Up(_) => Some(PointerEvent::up(x, y)),
        _ => None,
    }
}

/// Convert a crossterm key event. Releases are dropped.
pub fn convert_key_event(event: CrosstermKeyEvent) -> Option<KeyPress> {
    if event.kind == KeyEventKind::Release {
        return None;
    }

    let key = match event.code {
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Escape".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        _ => return None,
    };

    Some(KeyPress {
        key,
        ctrl: event.modifiers.contains(KeyModifiers::CONTROL),
    })
}

/// Convert any crossterm event.
pub fn convert_event(event: CrosstermEvent, scale: CellScale) -> InputEvent {
    match event {
        CrosstermEvent::Mouse(mouse) => convert_mouse_event(mouse, scale)
            .map(InputEvent::Pointer)
            .unwrap_or(InputEvent::None),
        CrosstermEvent::Key(key) => convert_key_event(key)
            .map(InputEvent::Key)
            .unwrap_or(InputEvent::None),
        CrosstermEvent::Resize(w, h) => InputEvent::Resize(w, h),
        _ => InputEvent::None,
    }
}

// =============================================================================
// EVENT POLLING
// =============================================================================

/// Poll for an event with timeout.
/// Returns None if no event within timeout.
pub fn poll_event(timeout: Duration, scale: CellScale) -> std::io::Result<Option<InputEvent>> {
    if poll(timeout)? {
        Ok(Some(convert_event(read()?, scale)))
    } else {
        Ok(None)
    }
}

// =============================================================================
// EVENT ROUTING
// =============================================================================

/// Route pointer events to the global pointer source.
/// Returns true if the event was a pointer event.
pub fn route_event(event: &InputEvent) -> bool {
    match event {
        InputEvent::Pointer(p) => {
            pointer::dispatch(*p);
            true
        }
        _ => false,
    }
}

// =============================================================================
// MOUSE CAPTURE
// =============================================================================

/// Enable mouse capture.
pub fn enable_mouse() -> std::io::Result<()> {
    execute!(stdout(), EnableMouseCapture)
}

/// Disable mouse capture.
pub fn disable_mouse() -> std::io::Result<()> {
    execute!(stdout(), DisableMouseCapture)
}

// =============================================================================
// TESTS
// =============================================================================
