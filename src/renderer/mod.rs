//! Renderer - Where mascot views go
//!
//! The controller pushes a [`MascotView`] on every state-affecting change and
//! a thinking offset on every frame while thinking. A [`RenderSink`] turns
//! those into output; the controller never reads anything back.
//!
//! - [`signal_sink`] - Reactive sink backed by spark-signals
//! - [`terminal`] - crossterm sink drawing the eye into any writer
//!
//! [`VisualClasses`] and [`pupil_offset`] hold the visual interpretation
//! shared by every sink.

pub mod signal_sink;
pub mod terminal;

use bitflags::bitflags;

use crate::constants::{PUPIL_OFFSET_MULTIPLIER, REDDEN_THRESHOLD};
use crate::types::{EyePosition, EyelidState, MascotState, MascotView};

pub use signal_sink::SignalSink;
pub use terminal::TerminalSink;

// =============================================================================
// SINK CONTRACT
// =============================================================================

pub trait RenderSink {
    /// Paint the current view.
    fn render(&mut self, view: &MascotView);

    /// Horizontal iris offset while thinking. `None` removes it.
    fn set_thinking_offset(&mut self, _offset: Option<f64>) {}

    /// Called once when the mascot is unmounted or destroyed.
    fn detach(&mut self) {}
}

// =============================================================================
// VISUAL CLASSES
// =============================================================================

bitflags! {
    /// Visual classes a view maps to.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct VisualClasses: u16 {
        // Pupil state
        const NEUTRAL = 1 << 0;
        const ALERT = 1 << 1;
        const RELAXED = 1 << 2;
        const POKE = 1 << 3;
        const THINKING = 1 << 4;

        // Eyelids (open has no class)
        const LID_CLOSED = 1 << 5;
        const LID_SQUINTING = 1 << 6;
        const LID_SQUINTING_LIGHT = 1 << 7;
        const LID_BLINKING = 1 << 8;
        const LID_THINKING = 1 << 9;

        // Eye
        const REDDENED = 1 << 10;
        // Iris
        const IRIS_THINKING = 1 << 11;
    }
}

impl VisualClasses {
    pub fn from_view(view: &MascotView) -> Self {
        let mut classes = match view.state {
            MascotState::Neutral => Self::NEUTRAL,
            MascotState::Alert => Self::ALERT,
            MascotState::Relaxed => Self::RELAXED,
            MascotState::Poke => Self::POKE,
            MascotState::Thinking => Self::THINKING | Self::IRIS_THINKING,
        };

        classes |= match view.eyelid_state {
            EyelidState::Open => Self::empty(),
            EyelidState::Closed => Self::LID_CLOSED,
            EyelidState::Squinting => Self::LID_SQUINTING,
            EyelidState::SquintingLight => Self::LID_SQUINTING_LIGHT,
            EyelidState::Blinking => Self::LID_BLINKING,
            EyelidState::Thinking => Self::LID_THINKING,
        };

        if view.poke_count >= REDDEN_THRESHOLD {
            classes |= Self::REDDENED;
        }

        classes
    }

    /// Class names, in flag order.
    pub fn names(&self) -> Vec<&'static str> {
        const NAMES: [(VisualClasses, &str); 12] = [
            (VisualClasses::NEUTRAL, "neutral"),
            (VisualClasses::ALERT, "alert"),
            (VisualClasses::RELAXED, "relaxed"),
            (VisualClasses::POKE, "poke"),
            (VisualClasses::THINKING, "thinking"),
            (VisualClasses::LID_CLOSED, "mascot--closed"),
            (VisualClasses::LID_SQUINTING, "mascot--squinting"),
            (VisualClasses::LID_SQUINTING_LIGHT, "mascot--squintingLight"),
            (VisualClasses::LID_BLINKING, "mascot--blinking"),
            (VisualClasses::LID_THINKING, "mascot--thinking"),
            (VisualClasses::REDDENED, "mascot--reddened"),
            (VisualClasses::IRIS_THINKING, "iris--thinking"),
        ];
        NAMES
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, name)| *name)
            .collect()
    }
}

/// Pupil offset inside the iris for a gaze position.
pub fn pupil_offset(position: EyePosition) -> EyePosition {
    EyePosition::new(
        position.x * PUPIL_OFFSET_MULTIPLIER,
        position.y * PUPIL_OFFSET_MULTIPLIER,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view(state: MascotState, eyelid_state: EyelidState, poke_count: u32) -> MascotView {
        MascotView {
            position: EyePosition::CENTER,
            state,
            eyelid_state,
            poke_count,
        }
    }

    #[test]
    fn test_open_has_no_lid_class() {
        let classes = VisualClasses::from_view(&view(MascotState::Neutral, EyelidState::Open, 0));
        assert_eq!(classes, VisualClasses::NEUTRAL);
    }

    #[test]
    fn test_thinking_marks_iris() {
        let classes =
            VisualClasses::from_view(&view(MascotState::Thinking, EyelidState::Thinking, 0));
        assert!(classes.contains(VisualClasses::THINKING | VisualClasses::IRIS_THINKING));
        assert!(classes.contains(VisualClasses::LID_THINKING));
    }

    #[test]
    fn test_reddened_at_threshold() {
        let once = VisualClasses::from_view(&view(MascotState::Poke, EyelidState::Closed, 1));
        let twice = VisualClasses::from_view(&view(MascotState::Poke, EyelidState::Closed, 2));
        assert!(!once.contains(VisualClasses::REDDENED));
        assert!(twice.contains(VisualClasses::REDDENED));
    }

    #[test]
    fn test_class_names() {
        let classes = VisualClasses::from_view(&view(MascotState::Alert, EyelidState::SquintingLight, 3));
        assert_eq!(
            classes.names(),
            vec!["alert", "mascot--squintingLight", "mascot--reddened"]
        );
    }

    #[test]
    fn test_pupil_offset() {
        let offset = pupil_offset(EyePosition::new(20.0, -10.0));
        assert!((offset.x - 3.0).abs() < 1e-9);
        assert!((offset.y + 1.5).abs() < 1e-9);
    }
}
