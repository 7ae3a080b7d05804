//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Frame scheduling (requestAnimationFrame on web)
//! - Input events (key and pointer mapping)

pub mod frame;
pub mod input;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use frame::{FrameClock, FrameLoop, FrameScheduler};
pub use input::Action;
