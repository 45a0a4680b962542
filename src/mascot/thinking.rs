//! Thinking oscillation.

use std::f64::consts::TAU;

use crate::constants::{THINKING_ANIMATION_AMPLITUDE, THINKING_ANIMATION_DURATION_MS};

/// Horizontal iris offset `elapsed_ms` into the thinking loop.
pub fn thinking_offset(elapsed_ms: f64) -> f64 {
    let cycle = elapsed_ms.rem_euclid(THINKING_ANIMATION_DURATION_MS) / THINKING_ANIMATION_DURATION_MS;
    (cycle * TAU).sin() * THINKING_ANIMATION_AMPLITUDE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_starts_at_zero() {
        assert!(close(thinking_offset(0.0), 0.0));
    }

    #[test]
    fn test_quarter_period_peaks() {
        let quarter = THINKING_ANIMATION_DURATION_MS / 4.0;
        assert!(close(thinking_offset(quarter), THINKING_ANIMATION_AMPLITUDE));
        assert!(close(thinking_offset(quarter * 3.0), -THINKING_ANIMATION_AMPLITUDE));
    }

    #[test]
    fn test_periodic() {
        let t = 321.0;
        assert!(close(
            thinking_offset(t),
            thinking_offset(t + THINKING_ANIMATION_DURATION_MS * 2.0)
        ));
    }
}
