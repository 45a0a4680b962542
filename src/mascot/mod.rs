//! Mascot Controller - The eye's state machine
//!
//! Owns the mascot state, eyelid state, gaze and every interaction flag.
//! Wires the pointer sampler, idle detection and both schedulers together,
//! applies the behavior resolvers, and pushes views into a [`RenderSink`].
//!
//! # Lifecycle
//!
//! ```text
//! Created --mount--> Mounted --unmount--> Detached --mount--> Mounted ...
//!    \                  |                    /
//!     `---------------destroy---------------'--> Destroyed
//! ```
//!
//! - Before the first mount, commands update state without rendering
//! - `unmount` and `destroy` cancel every timer, the thinking loop and the
//!   pointer subscription before returning, and are safe to repeat
//! - After `destroy`, commands are ignored and `mount` fails
//! - Dropping a `Mascot` destroys it
//!
//! # Priorities
//!
//! poke > very-close alert lock > host request. Poke and blink own the
//! eyelid while active; an explicit squint is never undone by proximity.
//!
//! # Example
//!
//! ```ignore
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use spark_mascot::{Mascot, MascotOptions, MascotState, Rect, SignalSink};
//!
//! let surface = Rc::new(Cell::new(Rect::new(0.0, 0.0, 120.0, 120.0)));
//! let sink = SignalSink::new();
//! let mascot = Mascot::new(MascotOptions::default());
//! mascot.mount(surface, sink.clone())?;
//!
//! mascot.set_state(MascotState::Thinking);
//! assert_eq!(sink.view().state, MascotState::Thinking);
//! ```

mod builder;
mod controller;
pub mod thinking;

use std::rc::Rc;

pub use builder::MascotBuilder;
use controller::MascotInner;

use crate::config::{MascotConfig, MascotOptions};
use crate::engine::timers::TimerKey;
use crate::error::Result;
use crate::renderer::RenderSink;
use crate::types::{EyePosition, EyelidState, MascotState, MascotView, Surface};

/// Where a mascot is in its mount bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Created,
    Mounted,
    Detached,
    Destroyed,
}

/// Interactive eye widget. Single-threaded; drive it with the
/// [`clock`](crate::engine::clock).
pub struct Mascot {
    inner: Rc<MascotInner>,
}

impl Mascot {
    pub fn new(options: MascotOptions) -> Self {
        MascotBuilder::new().options(options).build()
    }

    pub fn builder() -> MascotBuilder {
        MascotBuilder::new()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Attach to a surface and a render sink.
    ///
    /// Resolves the runtime config, starts pointer tracking and glances
    /// (not on touch devices), renders once, and starts blinking.
    pub fn mount(&self, surface: Rc<dyn Surface>, sink: impl RenderSink + 'static) -> Result<()> {
        self.inner.mount(surface, Box::new(sink))
    }

    /// Tear down and detach the sink. The mascot can be mounted again.
    pub fn unmount(&self) {
        self.inner.unmount();
    }

    /// Tear down for good.
    pub fn destroy(&self) {
        self.inner.destroy();
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.lifecycle()
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.is_mounted()
    }

    // =========================================================================
    // Commands
    // =========================================================================

    pub fn set_state(&self, state: MascotState) {
        self.inner.set_state(state);
    }

    /// Ignored while poked or blinking.
    pub fn set_eyelid_state(&self, eyelid: EyelidState) {
        self.inner.set_eyelid_state(eyelid);
    }

    /// Ignored while poked or blinking.
    pub fn open_eyelids(&self) {
        self.inner.open_eyelids();
    }

    /// Move the gaze, clamped to the configured bounds. Ignored under
    /// reduced motion; mid-glance only the restore target moves.
    pub fn look_at(&self, position: EyePosition) {
        self.inner.look_at(position);
    }

    pub fn poke(&self) {
        self.inner.poke();
    }

    /// Ignored unless the eyelid is open and no blink is running.
    pub fn blink(&self) {
        self.inner.blink();
    }

    pub fn enable_pointer_tracking(&self) {
        self.inner.enable_pointer_tracking();
    }

    /// Also releases a pending very-close override.
    pub fn disable_pointer_tracking(&self) {
        self.inner.disable_pointer_tracking();
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get_state(&self) -> MascotState {
        self.inner.state()
    }

    pub fn get_eyelid_state(&self) -> EyelidState {
        self.inner.eyelid_state()
    }

    pub fn get_position(&self) -> EyePosition {
        self.inner.position()
    }

    pub fn view(&self) -> MascotView {
        self.inner.view()
    }

    pub fn poke_count(&self) -> u32 {
        self.inner.poke_count()
    }

    pub fn is_poked(&self) -> bool {
        self.inner.is_poked()
    }

    pub fn is_blinking(&self) -> bool {
        self.inner.is_blinking()
    }

    pub fn is_glancing(&self) -> bool {
        self.inner.is_glancing()
    }

    pub fn is_cursor_idle(&self) -> bool {
        self.inner.is_cursor_idle()
    }

    pub fn is_cursor_close(&self) -> bool {
        self.inner.is_cursor_close()
    }

    pub fn is_cursor_very_close(&self) -> bool {
        self.inner.is_cursor_very_close()
    }

    pub fn is_pointer_tracking_enabled(&self) -> bool {
        self.inner.is_pointer_tracking_enabled()
    }

    pub fn is_thinking_animating(&self) -> bool {
        self.inner.is_thinking_animating()
    }

    /// Resolved config. Environment detection only happens at mount.
    pub fn config(&self) -> MascotConfig {
        self.inner.config()
    }

    /// Whether a timer is armed under `key`.
    pub fn has_timer(&self, key: TimerKey) -> bool {
        self.inner.timers().has(key)
    }

    /// Number of armed timers.
    pub fn active_timers(&self) -> usize {
        self.inner.timers().len()
    }
}

impl Default for Mascot {
    fn default() -> Self {
        Self::new(MascotOptions::default())
    }
}

impl Drop for Mascot {
    fn drop(&mut self) {
        self.inner.destroy();
    }
}

// =============================================================================
// TESTS
// =============================================================================
