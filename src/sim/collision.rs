//! Collision and scoring evaluation
//!
//! Runs once on the post-step state. Scoring is checked before collisions so
//! an obstacle cleared on the same step as a crash still counts.

use super::state::{CrashCause, GameEvent, GamePhase, GameState, Obstacle};

/// Ceiling/floor contact. Touching either edge counts.
pub fn boundary_collision(state: &GameState) -> Option<CrashCause> {
    if state.character.y <= 0.0 {
        Some(CrashCause::Ceiling)
    } else if state.character_bottom() >= state.tuning.playfield_height {
        Some(CrashCause::Floor)
    } else {
        None
    }
}

/// Horizontal overlap with strict inequalities: sharing an edge is not overlap
pub fn overlaps_horizontally(state: &GameState, obstacle: &Obstacle) -> bool {
    obstacle.x < state.character_right()
        && obstacle.right(&state.tuning) > state.tuning.character_x
}

/// Vertical containment in the gap, inclusive of the gap edges
pub fn within_gap(state: &GameState, obstacle: &Obstacle) -> bool {
    state.character.y >= obstacle.gap_y
        && state.character_bottom() <= obstacle.gap_bottom(&state.tuning)
}

/// First obstacle the character is touching outside its gap
pub fn obstacle_collision(state: &GameState) -> Option<CrashCause> {
    state
        .obstacles
        .iter()
        .find(|o| overlaps_horizontally(state, o) && !within_gap(state, o))
        .map(|o| CrashCause::Obstacle { id: o.id })
}

/// Score passed obstacles, then end the round on any collision
pub fn evaluate(state: &mut GameState) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Active {
        return events;
    }

    // Cleared once the trailing edge is strictly left of the character's
    // leading (right) edge, even while the two still overlap
    let leading_edge = state.character_right();
    let obstacle_width = state.tuning.obstacle_width;
    for obstacle in state.obstacles.iter_mut() {
        if !obstacle.passed && obstacle.x + obstacle_width < leading_edge {
            obstacle.passed = true;
            state.score += 1;
            events.push(GameEvent::Scored { score: state.score });
        }
    }

    if let Some(cause) = boundary_collision(state).or_else(|| obstacle_collision(state)) {
        events.extend(state.end_round(cause));
    }

    events
}
