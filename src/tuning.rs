//! Game balance and playfield geometry
//!
//! Defaults come from [`crate::consts`]. A page can override any subset of
//! fields with a JSON object in the canvas element's `data-tuning` attribute.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Reasons a tuning override is rejected
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("invalid tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be positive (got {value})")]
    NotPositive { field: &'static str, value: f32 },
    #[error("jump impulse must point up (negative), got {0}")]
    ImpulseNotUpward(f32),
    #[error("rotation range is inverted: min {min} > max {max}")]
    InvertedRotation { min: f32, max: f32 },
    #[error("gap of {gap} plus margins of {margin} does not fit a playfield of height {height}")]
    GapDoesNotFit { gap: f32, margin: f32, height: f32 },
    #[error("character does not fit the playfield")]
    CharacterOutOfBounds,
}

/// Tunable physics and geometry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub playfield_width: f32,
    pub playfield_height: f32,

    pub character_x: f32,
    pub character_width: f32,
    pub character_height: f32,

    pub gravity: f32,
    pub jump_impulse: f32,

    pub rotation_scale: f32,
    pub rotation_min: f32,
    pub rotation_max: f32,

    pub obstacle_width: f32,
    pub obstacle_speed: f32,
    pub gap_height: f32,
    pub gap_margin: f32,
    pub spawn_threshold: f32,

    /// Run the simulation on a fixed clock instead of once per display frame
    pub fixed_timestep: bool,
    pub step_hz: f32,
    pub max_steps_per_frame: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            playfield_width: PLAYFIELD_WIDTH,
            playfield_height: PLAYFIELD_HEIGHT,

            character_x: CHARACTER_X,
            character_width: CHARACTER_WIDTH,
            character_height: CHARACTER_HEIGHT,

            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,

            rotation_scale: ROTATION_SCALE,
            rotation_min: ROTATION_MIN,
            rotation_max: ROTATION_MAX,

            obstacle_width: OBSTACLE_WIDTH,
            obstacle_speed: OBSTACLE_SPEED,
            gap_height: GAP_HEIGHT,
            gap_margin: GAP_MARGIN,
            spawn_threshold: SPAWN_THRESHOLD,

            fixed_timestep: true,
            step_hz: STEP_HZ,
            max_steps_per_frame: MAX_STEPS_PER_FRAME,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate the result
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Check that the geometry admits a playable round
    pub fn validate(&self) -> Result<(), TuningError> {
        let positive = [
            ("playfield_width", self.playfield_width),
            ("playfield_height", self.playfield_height),
            ("character_width", self.character_width),
            ("character_height", self.character_height),
            ("obstacle_width", self.obstacle_width),
            ("obstacle_speed", self.obstacle_speed),
            ("gap_height", self.gap_height),
            ("spawn_threshold", self.spawn_threshold),
            ("step_hz", self.step_hz),
        ];
        for (field, value) in positive {
            // NaN fails this check too
            if !(value > 0.0) {
                return Err(TuningError::NotPositive { field, value });
            }
        }
        if !(self.gravity >= 0.0) {
            return Err(TuningError::NotPositive {
                field: "gravity",
                value: self.gravity,
            });
        }
        if !(self.gap_margin >= 0.0) {
            return Err(TuningError::NotPositive {
                field: "gap_margin",
                value: self.gap_margin,
            });
        }
        if self.max_steps_per_frame == 0 {
            return Err(TuningError::NotPositive {
                field: "max_steps_per_frame",
                value: 0.0,
            });
        }
        if !(self.jump_impulse < 0.0) {
            return Err(TuningError::ImpulseNotUpward(self.jump_impulse));
        }
        if self.rotation_min > self.rotation_max {
            return Err(TuningError::InvertedRotation {
                min: self.rotation_min,
                max: self.rotation_max,
            });
        }
        if self.gap_height + 2.0 * self.gap_margin > self.playfield_height {
            return Err(TuningError::GapDoesNotFit {
                gap: self.gap_height,
                margin: self.gap_margin,
                height: self.playfield_height,
            });
        }
        if self.character_x < 0.0
            || self.character_x + self.character_width > self.playfield_width
            || self.character_height >= self.playfield_height
        {
            return Err(TuningError::CharacterOutOfBounds);
        }
        Ok(())
    }

    /// Lowest valid `y` for the character's top edge
    pub fn max_character_y(&self) -> f32 {
        self.playfield_height - self.character_height
    }

    /// Starting `y` that vertically centers the character
    pub fn center_y(&self) -> f32 {
        self.max_character_y() / 2.0
    }

    /// Inclusive range for a freshly spawned obstacle's `gap_y`
    pub fn gap_bounds(&self) -> (f32, f32) {
        (
            self.gap_margin,
            self.playfield_height - self.gap_height - self.gap_margin,
        )
    }

    /// Load overrides from the canvas `data-tuning` attribute (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let attr = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id("canvas"))
            .and_then(|canvas| canvas.get_attribute("data-tuning"));

        match attr {
            Some(json) => match Self::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning overrides from data-tuning");
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring data-tuning: {}", e);
                    Self::default()
                }
            },
            None => Self::default(),
        }
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}

/// Read a `seed=` parameter from a URL query string like `?seed=42&x=1`
pub fn seed_from_query(search: &str) -> Option<u64> {
    search
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "seed")
        .and_then(|(_, value)| value.parse().ok())
}
