//! Skyhop - A side-scrolling gap-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, obstacles, collisions, scoring)
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Frame scheduling and input mapping
//! - `tuning`: Data-driven game balance

pub mod platform;
pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError, seed_from_query};

/// Game configuration constants (defaults for [`Tuning`])
pub mod consts {
    /// Playfield dimensions in logical pixels
    pub const PLAYFIELD_WIDTH: f32 = 400.0;
    pub const PLAYFIELD_HEIGHT: f32 = 600.0;

    /// Character box. Its horizontal position never changes.
    pub const CHARACTER_X: f32 = 50.0;
    pub const CHARACTER_WIDTH: f32 = 34.0;
    pub const CHARACTER_HEIGHT: f32 = 24.0;

    /// Downward acceleration, added to velocity every step
    pub const GRAVITY: f32 = 0.6;
    /// Velocity set on jump (negative = up)
    pub const JUMP_IMPULSE: f32 = -10.0;

    /// Rotation in degrees per unit of velocity
    pub const ROTATION_SCALE: f32 = 3.0;
    pub const ROTATION_MIN: f32 = -30.0;
    pub const ROTATION_MAX: f32 = 90.0;

    /// Obstacle defaults
    pub const OBSTACLE_WIDTH: f32 = 60.0;
    pub const OBSTACLE_SPEED: f32 = 3.0;
    pub const GAP_HEIGHT: f32 = 160.0;
    /// Minimum distance between the gap and the playfield top/bottom
    pub const GAP_MARGIN: f32 = 60.0;
    /// Horizontal distance scrolled between spawns
    pub const SPAWN_THRESHOLD: f32 = 220.0;

    /// Fixed simulation rate (matches a 60 Hz display)
    pub const STEP_HZ: f32 = 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_STEPS_PER_FRAME: u32 = 4;
    /// Frame deltas above this (seconds) are clamped, e.g. after a tab switch
    pub const MAX_FRAME_DELTA: f32 = 0.1;
}
