//! The single "activate" intent and how each phase reacts to it

use super::state::{GameEvent, GamePhase, GameState};

/// Apply a jump/start/reset depending on the current phase
pub fn activate(state: &mut GameState) -> Vec<GameEvent> {
    match state.phase {
        GamePhase::Idle => {
            state.phase = GamePhase::Active;
            state.character.velocity = state.tuning.jump_impulse;
            vec![GameEvent::Started, GameEvent::Jumped]
        }
        GamePhase::Active => {
            // Velocity is set, not added: repeated presses within a frame collapse
            state.character.velocity = state.tuning.jump_impulse;
            vec![GameEvent::Jumped]
        }
        GamePhase::Ended => {
            state.reset_round();
            vec![GameEvent::Reset]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::Obstacle;

    #[test]
    fn test_idle_activate_starts_round() {
        let mut state = GameState::default();
        let y = state.character.y;
        let events = activate(&mut state);
        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.character.velocity, -10.0);
        assert_eq!(state.character.y, y);
        assert_eq!(events, vec![GameEvent::Started, GameEvent::Jumped]);
    }

    #[test]
    fn test_active_activate_is_last_write_wins() {
        let mut state = GameState::default();
        activate(&mut state);
        state.character.velocity = 7.5;
        state.character.y = 123.0;
        activate(&mut state);
        activate(&mut state);
        activate(&mut state);
        assert_eq!(state.character.velocity, state.tuning.jump_impulse);
        assert_eq!(state.character.y, 123.0);
        assert_eq!(state.phase, GamePhase::Active);
    }

    #[test]
    fn test_ended_activate_resets_to_idle() {
        let mut state = GameState::default();
        state.phase = GamePhase::Ended;
        state.character.y = 500.0;
        state.character.velocity = 12.0;
        state.character.rotation = 36.0;
        state.score = 4;
        state.best_score = 4;
        state.spawn_accumulator = 90.0;
        let id = state.next_obstacle_id();
        state.obstacles.push(Obstacle {
            id,
            x: 10.0,
            gap_y: 100.0,
            passed: true,
        });

        let events = activate(&mut state);
        assert_eq!(events, vec![GameEvent::Reset]);
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.character.y, state.tuning.center_y());
        assert_eq!(state.character.velocity, 0.0);
        assert_eq!(state.character.rotation, 0.0);
        assert!(state.obstacles.is_empty());
        assert_eq!(state.score, 0);
        assert_eq!(state.spawn_accumulator, 0.0);
        assert_eq!(state.best_score, 4);
    }
}
