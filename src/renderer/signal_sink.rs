//! Reactive render sink.
//!
//! Mirrors everything the controller pushes into spark-signals, so a host can
//! build effects and deriveds on top of the mascot instead of polling it.
//!
//! # Example
//!
//! ```ignore
//! let sink = SignalSink::new();
//! let view = sink.view_signal();
//! let _e = effect(move || println!("{:?}", view.get()));
//! mascot.mount(surface, sink.clone())?;
//! ```

use spark_signals::{Signal, signal};

use super::RenderSink;
use crate::types::MascotView;

/// Cheap to clone; clones share the same signals.
#[derive(Clone)]
pub struct SignalSink {
    view: Signal<MascotView>,
    thinking_offset: Signal<Option<f64>>,
    renders: Signal<u64>,
    attached: Signal<bool>,
}

impl SignalSink {
    pub fn new() -> Self {
        Self {
            view: signal(MascotView::default()),
            thinking_offset: signal(None),
            renders: signal(0),
            attached: signal(true),
        }
    }

    pub fn view(&self) -> MascotView {
        self.view.get()
    }

    pub fn thinking_offset(&self) -> Option<f64> {
        self.thinking_offset.get()
    }

    /// Number of render calls received.
    pub fn renders(&self) -> u64 {
        self.renders.get()
    }

    pub fn is_attached(&self) -> bool {
        self.attached.get()
    }

    pub fn view_signal(&self) -> Signal<MascotView> {
        self.view.clone()
    }

    pub fn thinking_offset_signal(&self) -> Signal<Option<f64>> {
        self.thinking_offset.clone()
    }

    pub fn renders_signal(&self) -> Signal<u64> {
        self.renders.clone()
    }
}

impl Default for SignalSink {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderSink for SignalSink {
    fn render(&mut self, view: &MascotView) {
        self.view.set(*view);
        self.renders.set(self.renders.get() + 1);
    }

    fn set_thinking_offset(&mut self, offset: Option<f64>) {
        self.thinking_offset.set(offset);
    }

    fn detach(&mut self) {
        self.attached.set(false);
    }
}
