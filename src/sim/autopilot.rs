//! Demo mode - a simple controller that plays the game
//!
//! Used by the native headless demo and by tests that need rounds to last.

use super::state::{GamePhase, GameState};

/// Fraction of the gap the character's bottom edge hovers around. A jump
/// rises less than the remaining headroom, so the character stays in the gap.
const TARGET_DEPTH: f32 = 0.85;

/// Whether the controller would jump now
pub fn should_jump(state: &GameState) -> bool {
    if state.phase != GamePhase::Active {
        return false;
    }

    // Aim for the first obstacle the character hasn't cleared yet
    let target = state
        .obstacles
        .iter()
        .find(|o| o.right(&state.tuning) >= state.tuning.character_x)
        .map(|o| o.gap_y + state.tuning.gap_height * TARGET_DEPTH)
        .unwrap_or(state.tuning.playfield_height * 0.5);

    state.character_bottom() > target && state.character.velocity > 0.0
}
