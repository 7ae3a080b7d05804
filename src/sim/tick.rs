//! Per-frame simulation step
//!
//! Explicit Euler integration at one step per display frame (or per fixed
//! clock tick, see [`crate::platform::frame::FrameClock`]).

use super::collision::evaluate;
use super::rng::GapSource;
use super::state::{GameEvent, GamePhase, GameState, Obstacle};

/// Advance physics and obstacles by one step. No-op unless the round is active.
pub fn advance<G: GapSource + ?Sized>(state: &mut GameState, gaps: &mut G) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase != GamePhase::Active {
        return events;
    }
    state.round_steps += 1;

    let gravity = state.tuning.gravity;
    let max_y = state.tuning.max_character_y();
    let rotation_scale = state.tuning.rotation_scale;
    let (rotation_min, rotation_max) = (state.tuning.rotation_min, state.tuning.rotation_max);
    let speed = state.tuning.obstacle_speed;
    let obstacle_width = state.tuning.obstacle_width;

    // Character
    let character = &mut state.character;
    character.velocity += gravity;
    character.y = (character.y + character.velocity).clamp(0.0, max_y);
    character.rotation = (character.velocity * rotation_scale).clamp(rotation_min, rotation_max);

    // Scroll and cull
    for obstacle in &mut state.obstacles {
        obstacle.x -= speed;
    }
    state.obstacles.retain(|o| o.x > -obstacle_width);

    // Spawn on a fixed horizontal cadence
    state.spawn_accumulator += speed;
    if state.spawn_accumulator > state.tuning.spawn_threshold {
        state.spawn_accumulator = 0.0;
        let (lo, hi) = state.tuning.gap_bounds();
        let gap_y = gaps.gap_offset(lo, hi).clamp(lo, hi);
        let id = state.next_obstacle_id();
        state.obstacles.push(Obstacle {
            id,
            x: state.tuning.playfield_width,
            gap_y,
            passed: false,
        });
        log::debug!("Spawned obstacle {} with gap at {:.1}", id, gap_y);
        events.push(GameEvent::Spawned { id });
    }

    events
}

/// One full simulation step: advance, then evaluate exactly once
pub fn tick<G: GapSource + ?Sized>(state: &mut GameState, gaps: &mut G) -> Vec<GameEvent> {
    let mut events = advance(state, gaps);
    events.extend(evaluate(state));
    events
}
