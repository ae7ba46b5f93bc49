//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform code:
//! - Time comes in as explicit timestamps/deltas (ms)
//! - Seeded RNG only
//! - Persistence only through the `ProgressStore` seam

pub mod collision;
pub mod level;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{Rect, TapOutcome, hit_test, tap};
pub use level::{advance_level, back_to_start, pause, restart, resume, start, stop, time_remaining_ms};
pub use spawn::{gold_chance, spawn_enemy};
pub use state::{
    Enemy, EnemyKind, Facing, GameEvent, MAX_PARTICLES, Particle, Player, RunPhase, RunState,
};
pub use tick::{TickInput, tick};
