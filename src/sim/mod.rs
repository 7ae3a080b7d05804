//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One step per frame or fixed clock tick, never wall-clock dependent
//! - Randomness only through [`GapSource`]
//! - Obstacles kept in spawn (id) order
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod input;
pub mod rng;
pub mod state;
pub mod tick;

pub use collision::{boundary_collision, evaluate, obstacle_collision};
pub use input::activate;
pub use rng::{GapSource, ScriptedGaps, seeded};
pub use state::{Character, CrashCause, GameEvent, GamePhase, GameState, Obstacle};
pub use tick::{advance, tick};
