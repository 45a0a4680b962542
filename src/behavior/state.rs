//! Requested-state resolution under the "very close" override.

use crate::types::MascotState;

/// Outcome of [`resolve_state_with_very_close`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateResolution {
    pub next: MascotState,
    /// One-slot memory of a request deferred by the override.
    pub previous_requested: Option<MascotState>,
}

/// Resolve a requested state.
///
/// Priority: `poke` always wins; while the pointer is very close, anything
/// other than `alert` is deferred (the current state stays and the request
/// is remembered, last write wins); otherwise the request applies and the
/// memory passes through.
pub fn resolve_state_with_very_close(
    current: MascotState,
    requested: MascotState,
    is_very_close: bool,
    previous_requested: Option<MascotState>,
) -> StateResolution {
    if requested == MascotState::Poke {
        return StateResolution {
            next: MascotState::Poke,
            previous_requested,
        };
    }

    if is_very_close && requested != MascotState::Alert {
        return StateResolution {
            next: current,
            previous_requested: Some(requested),
        };
    }

    StateResolution {
        next: requested,
        previous_requested,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use MascotState::*;

    #[test]
    fn test_poke_always_wins() {
        for current in MascotState::ALL {
            for very_close in [false, true] {
                let r = resolve_state_with_very_close(current, Poke, very_close, Some(Relaxed));
                assert_eq!(r.next, Poke);
                assert_eq!(r.previous_requested, Some(Relaxed));
            }
        }
    }

    #[test]
    fn test_very_close_defers_request() {
        let r = resolve_state_with_very_close(Alert, Relaxed, true, None);
        assert_eq!(r.next, Alert);
        assert_eq!(r.previous_requested, Some(Relaxed));
    }

    #[test]
    fn test_very_close_last_write_wins() {
        let r = resolve_state_with_very_close(Alert, Thinking, true, Some(Relaxed));
        assert_eq!(r.next, Alert);
        assert_eq!(r.previous_requested, Some(Thinking));
    }

    #[test]
    fn test_very_close_allows_alert() {
        let r = resolve_state_with_very_close(Neutral, Alert, true, Some(Relaxed));
        assert_eq!(r.next, Alert);
        assert_eq!(r.previous_requested, Some(Relaxed));
    }

    #[test]
    fn test_request_applies_when_not_very_close() {
        let r = resolve_state_with_very_close(Neutral, Relaxed, false, None);
        assert_eq!(r.next, Relaxed);
        assert_eq!(r.previous_requested, None);
    }
}
