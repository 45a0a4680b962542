//! Eyelid resolution from pointer proximity.

use crate::types::EyelidState;

/// Inputs to [`resolve_eyelid_from_proximity`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EyelidInputs {
    pub current: EyelidState,
    pub is_poked: bool,
    pub is_blinking: bool,
    pub is_cursor_close: bool,
    pub is_explicitly_squinting: bool,
}

/// Proximity only toggles the light squint.
///
/// - poked or blinking: unchanged, they own the eyelid while active
/// - close: `squintingLight` unless explicitly squinting or already squinting
/// - not close: back to `open` from a squint, unless the squint is explicit
pub fn resolve_eyelid_from_proximity(inputs: EyelidInputs) -> EyelidState {
    let EyelidInputs {
        current,
        is_poked,
        is_blinking,
        is_cursor_close,
        is_explicitly_squinting,
    } = inputs;

    if is_poked || is_blinking {
        return current;
    }

    if is_cursor_close {
        if !is_explicitly_squinting && !current.is_squint() {
            return EyelidState::SquintingLight;
        }
        return current;
    }

    if !is_explicitly_squinting && current.is_squint() {
        return EyelidState::Open;
    }

    current
}
