//! Enemy spawn policy
//!
//! Spawning is a pure function of level, canvas size and the RNG; cadence
//! (the spawn timer) is handled by the tick.

use glam::Vec2;
use rand::Rng;

use super::state::{Enemy, EnemyKind};
use crate::consts::{SPAWN_MARGIN_Y, SPAWN_OFFSET_X};
use crate::rand_range;
use crate::tuning::Tuning;

/// Probability that a spawn at `level` is gold
pub fn gold_chance(tuning: &Tuning, level: u32) -> f32 {
    (tuning.gold_chance_base + level as f32 * tuning.gold_chance_per_level)
        .min(tuning.gold_chance_cap)
}

/// Hitbox size for an enemy of `kind` at `level`
pub fn enemy_size(tuning: &Tuning, kind: EnemyKind, level: u32) -> f32 {
    match kind {
        EnemyKind::Gold => tuning.gold_size,
        EnemyKind::Normal => {
            let bonus = (level as f32 * tuning.normal_size_per_level).min(tuning.normal_size_bonus_cap);
            tuning.normal_base_size + bonus
        }
    }
}

/// Create one enemy just past the right edge of the canvas
pub fn spawn_enemy<R: Rng + ?Sized>(rng: &mut R, tuning: &Tuning, id: u32, level: u32, canvas: Vec2) -> Enemy {
    let base_speed = rand_range(rng, tuning.enemy_speed_min, tuning.enemy_speed_max);
    let y = rand_range(rng, SPAWN_MARGIN_Y, canvas.y - SPAWN_MARGIN_Y);
    let x = canvas.x + SPAWN_OFFSET_X;

    let kind = if rng.random::<f32>() < gold_chance(tuning, level) {
        EnemyKind::Gold
    } else {
        EnemyKind::Normal
    };
    let speed = match kind {
        EnemyKind::Gold => base_speed * tuning.gold_speed_multiplier,
        EnemyKind::Normal => base_speed,
    };

    Enemy {
        id,
        pos: Vec2::new(x, y),
        kind,
        size: enemy_size(tuning, kind, level),
        speed,
        direction: -1.0,
    }
}
