//! Ant Survival - a tap-and-dodge canvas arcade game
//!
//! Core modules:
//! - `sim`: Simulation (spawning, motion, collisions, scoring, level timer)
//! - `renderer`: Sprite/fallback render strategy and the Canvas2D backend
//! - `platform`: Browser/native platform abstraction (input, storage, time)
//! - `persistence`: Unlocked level and high score
//! - `tuning`: Data-driven game balance
//! - `hud`: Score readouts and transient messages

pub mod hud;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use persistence::Progress;
pub use settings::{QualityPreset, Settings};
pub use tuning::Tuning;

use rand::Rng;

/// Game configuration constants
pub mod consts {
    /// Simulation speeds are expressed per 16 ms reference frame
    pub const REFERENCE_FRAME_MS: f32 = 16.0;
    /// Smallest frame delta the driver will ever report
    pub const MIN_FRAME_DT_MS: f64 = 0.1;

    /// Default canvas dimensions (native/headless runs)
    pub const DEFAULT_CANVAS_WIDTH: f32 = 960.0;
    pub const DEFAULT_CANVAS_HEIGHT: f32 = 540.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 48.0;
    pub const PLAYER_SPEED: f32 = 3.6;
    /// Start position as a fraction of the canvas
    pub const PLAYER_START_X: f32 = 0.12;
    pub const PLAYER_START_Y: f32 = 0.5;

    /// Enemy spawn geometry
    pub const SPAWN_MARGIN_Y: f32 = 40.0;
    pub const SPAWN_OFFSET_X: f32 = 20.0;
    /// Enemies past this far outside the canvas are culled
    pub const OFFSCREEN_MARGIN: f32 = 80.0;

    /// Per-axis scale applied when moving diagonally (sqrt(2)/2)
    pub const DIAGONAL_SCALE: f32 = 0.7071;
}

/// Uniform sample in `[lo, hi)`; degenerate ranges collapse to `lo`
#[inline]
pub fn rand_range<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi > lo {
        rng.random_range(lo..hi)
    } else {
        lo
    }
}
