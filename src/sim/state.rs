//! Game state and core simulation types
//!
//! Everything the input handler, the step and the evaluator touch lives in
//! one owned [`GameState`].

use serde::{Deserialize, Serialize};

use crate::tuning::{Tuning, TuningError};

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the first jump
    Idle,
    /// Simulation running
    Active,
    /// Crashed; waiting for input to reset
    Ended,
}

/// What ended a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CrashCause {
    Ceiling,
    Floor,
    Obstacle { id: u32 },
}

/// Things that happened during input handling or a step (for logging and HUD)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    Started,
    Jumped,
    Spawned { id: u32 },
    Scored { score: u32 },
    Crashed { cause: CrashCause, score: u32 },
    NewBest { score: u32 },
    Reset,
}

/// The player-controlled character. Its horizontal span is fixed by [`Tuning`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Character {
    /// Top edge, 0 at the playfield top
    pub y: f32,
    /// Positive is downward
    pub velocity: f32,
    /// Degrees; display only
    pub rotation: f32,
}

impl Character {
    pub fn centered(tuning: &Tuning) -> Self {
        Self {
            y: tuning.center_y(),
            velocity: 0.0,
            rotation: 0.0,
        }
    }
}

/// A top/bottom barrier pair with a passable gap
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Left edge
    pub x: f32,
    /// Top of the gap
    pub gap_y: f32,
    /// Set once the character has cleared it; never reverts
    pub passed: bool,
}

impl Obstacle {
    /// Right (trailing) edge
    pub fn right(&self, tuning: &Tuning) -> f32 {
        self.x + tuning.obstacle_width
    }

    /// Bottom of the gap
    pub fn gap_bottom(&self, tuning: &Tuning) -> f32 {
        self.gap_y + tuning.gap_height
    }
}

/// Complete game state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub tuning: Tuning,
    pub phase: GamePhase,
    pub character: Character,
    /// Ordered by spawn time (and therefore by id)
    pub obstacles: Vec<Obstacle>,
    pub score: u32,
    /// Best score this session; survives resets, never persisted
    pub best_score: u32,
    /// Score of the most recently ended round
    pub last_score: u32,
    pub rounds_played: u32,
    /// Distance scrolled since the last spawn
    pub spawn_accumulator: f32,
    /// Steps taken in the current round
    pub round_steps: u64,
    /// Next obstacle ID
    next_id: u32,
}

impl GameState {
    /// Build a fresh Idle state. Rejects tuning whose clamp ranges or gap
    /// bounds would be inverted.
    pub fn new(tuning: Tuning) -> Result<Self, TuningError> {
        tuning.validate()?;
        Ok(Self::with_valid_tuning(tuning))
    }

    fn with_valid_tuning(tuning: Tuning) -> Self {
        Self {
            character: Character::centered(&tuning),
            tuning,
            phase: GamePhase::Idle,
            obstacles: Vec::new(),
            score: 0,
            best_score: 0,
            last_score: 0,
            rounds_played: 0,
            spawn_accumulator: 0.0,
            round_steps: 0,
            next_id: 1,
        }
    }

    /// Allocate a new obstacle ID
    pub fn next_obstacle_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Clear everything round-local. Best score, round count and the ID
    /// counter carry over so obstacle IDs stay unique for the session.
    pub fn reset_round(&mut self) {
        self.character = Character::centered(&self.tuning);
        self.obstacles.clear();
        self.score = 0;
        self.spawn_accumulator = 0.0;
        self.round_steps = 0;
        self.phase = GamePhase::Idle;
    }

    /// Finish the round on a crash: record the score and update the session best
    pub fn end_round(&mut self, cause: CrashCause) -> Vec<GameEvent> {
        let mut events = vec![GameEvent::Crashed {
            cause,
            score: self.score,
        }];
        self.phase = GamePhase::Ended;
        events.extend(self.record_score());
        events
    }

    /// Count the round and fold its score into the session best.
    /// Leaves the phase alone.
    pub fn record_score(&mut self) -> Option<GameEvent> {
        self.rounds_played += 1;
        self.last_score = self.score;
        if self.score > self.best_score {
            self.best_score = self.score;
            Some(GameEvent::NewBest { score: self.score })
        } else {
            None
        }
    }

    /// Right edge of the character's fixed horizontal span
    pub fn character_right(&self) -> f32 {
        self.tuning.character_x + self.tuning.character_width
    }

    /// Bottom edge of the character
    pub fn character_bottom(&self) -> f32 {
        self.character.y + self.tuning.character_height
    }
}

impl Default for GameState {
    fn default() -> Self {
        // Defaults are checked by tuning::tests::test_defaults_are_valid
        Self::with_valid_tuning(Tuning::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_is_idle_and_centered() {
        let state = GameState::default();
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.character.y, state.tuning.center_y());
        assert_eq!(state.character.velocity, 0.0);
        assert!(state.obstacles.is_empty());
    }

    #[test]
    fn test_ids_are_unique_across_resets() {
        let mut state = GameState::default();
        let a = state.next_obstacle_id();
        state.reset_round();
        let b = state.next_obstacle_id();
        assert!(b > a);
    }

    #[test]
    fn test_end_round_only_raises_best() {
        let mut state = GameState::default();
        state.phase = GamePhase::Active;
        state.score = 5;
        let events = state.end_round(CrashCause::Floor);
        assert_eq!(state.best_score, 5);
        assert!(events.contains(&GameEvent::NewBest { score: 5 }));

        state.reset_round();
        state.score = 3;
        let events = state.end_round(CrashCause::Ceiling);
        assert_eq!(state.best_score, 5);
        assert_eq!(state.last_score, 3);
        assert_eq!(state.rounds_played, 2);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::NewBest { .. })));
    }

    #[test]
    fn test_new_rejects_invalid_tuning() {
        let tuning = Tuning {
            rotation_min: 10.0,
            rotation_max: -10.0,
            ..Default::default()
        };
        assert!(matches!(
            GameState::new(tuning),
            Err(TuningError::InvertedRotation { .. })
        ));

        let tuning = Tuning {
            character_height: 700.0,
            ..Default::default()
        };
        assert!(matches!(
            GameState::new(tuning),
            Err(TuningError::CharacterOutOfBounds)
        ));
    }

    #[test]
    fn test_new_accepts_valid_tuning() {
        let tuning = Tuning {
            gravity: 0.4,
            ..Default::default()
        };
        let state = GameState::new(tuning).unwrap();
        assert_eq!(state.phase, GamePhase::Idle);
        assert_eq!(state.tuning.gravity, 0.4);
    }

    #[test]
    fn test_record_score_keeps_phase() {
        let mut state = GameState::default();
        state.phase = GamePhase::Active;
        state.score = 2;
        assert_eq!(state.record_score(), Some(GameEvent::NewBest { score: 2 }));
        assert_eq!(state.phase, GamePhase::Active);
        assert_eq!(state.rounds_played, 1);
        assert_eq!(state.last_score, 2);

        state.reset_round();
        assert_eq!(state.record_score(), None);
        assert_eq!(state.best_score, 2);
        assert_eq!(state.last_score, 0);
    }

    #[test]
    fn test_snapshot_keeps_id_counter() {
        let mut state = GameState::default();
        state.phase = GamePhase::Active;
        state.next_obstacle_id();

        let json = serde_json::to_string(&state).unwrap();
        assert!(json.contains(r#""phase":"Active""#));

        let mut restored: GameState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.next_obstacle_id(), 2);
    }
}
