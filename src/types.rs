//! Core types for spark-mascot.
//!
//! These are the values that flow between the pointer source, the behavior
//! resolvers, the schedulers and the render sink.

use std::fmt;

// =============================================================================
// Mascot State
// =============================================================================

/// Behavioral mode of the mascot. Drives the pupil class and side effects
/// (thinking oscillation, pointer-tracking suspension).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MascotState {
    #[default]
    Neutral,
    Alert,
    Relaxed,
    Poke,
    Thinking,
}

impl MascotState {
    /// All states, in declaration order.
    pub const ALL: [MascotState; 5] = [
        MascotState::Neutral,
        MascotState::Alert,
        MascotState::Relaxed,
        MascotState::Poke,
        MascotState::Thinking,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Neutral => "neutral",
            Self::Alert => "alert",
            Self::Relaxed => "relaxed",
            Self::Poke => "poke",
            Self::Thinking => "thinking",
        }
    }
}

impl fmt::Display for MascotState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Eyelid State
// =============================================================================

/// Eyelid pose. Independent axis from [`MascotState`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EyelidState {
    #[default]
    Open,
    Closed,
    Squinting,
    SquintingLight,
    Blinking,
    Thinking,
}

impl EyelidState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Closed => "closed",
            Self::Squinting => "squinting",
            Self::SquintingLight => "squintingLight",
            Self::Blinking => "blinking",
            Self::Thinking => "thinking",
        }
    }

    /// True for both the explicit and the proximity squint.
    pub fn is_squint(&self) -> bool {
        matches!(self, Self::Squinting | Self::SquintingLight)
    }
}

impl fmt::Display for EyelidState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Geometry
// =============================================================================

/// Gaze offset from the eye center, in abstract units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EyePosition {
    pub x: f64,
    pub y: f64,
}

impl EyePosition {
    /// Centered gaze.
    pub const CENTER: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamp into `[-clamp_x, clamp_x] x [-clamp_y, clamp_y]`.
    pub fn clamped(self, clamp_x: f64, clamp_y: f64) -> Self {
        Self {
            x: self.x.max(-clamp_x).min(clamp_x),
            y: self.y.max(-clamp_y).min(clamp_y),
        }
    }
}

/// Axis-aligned bounds of the surface the mascot is mounted on.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point of the rectangle.
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Whether a point lies inside (edges inclusive).
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    /// Finite, non-negative size.
    pub fn is_valid(&self) -> bool {
        [self.x, self.y, self.width, self.height]
            .iter()
            .all(|v| v.is_finite())
            && self.width >= 0.0
            && self.height >= 0.0
    }
}

/// A surface the mascot can be mounted on.
///
/// Bounds are re-read on every pointer sample, so a moving surface is
/// tracked without remounting.
pub trait Surface {
    fn bounds(&self) -> Rect;
}

impl Surface for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

impl Surface for std::cell::Cell<Rect> {
    fn bounds(&self) -> Rect {
        self.get()
    }
}

// =============================================================================
// Pointer Metrics
// =============================================================================

/// Pointer position relative to the surface center.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerMetrics {
    pub delta_x: f64,
    pub delta_y: f64,
    pub distance: f64,
}

impl PointerMetrics {
    /// Metrics of a pointer at `(x, y)` against `bounds`.
    pub fn measure(x: f64, y: f64, bounds: &Rect) -> Self {
        let (cx, cy) = bounds.center();
        let delta_x = x - cx;
        let delta_y = y - cy;
        Self {
            delta_x,
            delta_y,
            distance: (delta_x * delta_x + delta_y * delta_y).sqrt(),
        }
    }
}

// =============================================================================
// View
// =============================================================================

/// Snapshot pushed to the render sink on every state-affecting change.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MascotView {
    pub position: EyePosition,
    pub state: MascotState,
    pub eyelid_state: EyelidState,
    pub poke_count: u32,
}

// =============================================================================
// Tests
// =============================================================================
