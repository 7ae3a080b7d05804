//! Maps raw key and pointer events to game actions

/// The only action the game recognizes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Jump, start a round, or reset after a crash
    Activate,
}

impl Action {
    /// Map a `KeyboardEvent.key` value. Auto-repeated keydowns map like any
    /// other press.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            " " | "Spacebar" | "ArrowUp" | "w" | "W" => Some(Action::Activate),
            _ => None,
        }
    }

    /// Map a `PointerEvent.button` value; only the primary button counts
    pub fn from_pointer_button(button: i16) -> Option<Self> {
        (button == 0).then_some(Action::Activate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_designated_keys() {
        for key in [" ", "ArrowUp", "w", "W"] {
            assert_eq!(Action::from_key(key), Some(Action::Activate));
        }
    }

    #[test]
    fn test_other_keys_ignored() {
        for key in ["Enter", "Escape", "a", "ArrowDown", ""] {
            assert_eq!(Action::from_key(key), None);
        }
    }

    #[test]
    fn test_held_key_keeps_jumping() {
        use crate::sim::{GamePhase, GameState, activate};

        let mut state = GameState::default();
        activate(&mut state);
        // Each auto-repeated keydown resolves to the same action again
        for _ in 0..3 {
            state.character.velocity = 4.0;
            if let Some(Action::Activate) = Action::from_key(" ") {
                activate(&mut state);
            }
            assert_eq!(state.character.velocity, state.tuning.jump_impulse);
        }
        assert_eq!(state.phase, GamePhase::Active);
    }

    #[test]
    fn test_pointer_primary_only() {
        assert_eq!(Action::from_pointer_button(0), Some(Action::Activate));
        assert_eq!(Action::from_pointer_button(2), None);
    }
}
