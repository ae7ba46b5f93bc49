//! Data-driven game balance
//!
//! Every number that shapes difficulty or scoring lives here so the
//! simulation never hardcodes balance values.

use serde::{Deserialize, Serialize};

use crate::sim::EnemyKind;

/// Gameplay balance knobs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    /// Length of one level (ms)
    pub level_duration_ms: f64,
    /// Maximum gap between tap kills that keeps a combo going (ms)
    pub combo_window_ms: f64,
    /// Multiplier bonus per combo step beyond the first
    pub combo_step: f64,
    /// Cap on the combo bonus (3.0 = +300%)
    pub combo_bonus_cap: f64,

    /// Spawn interval at the start of a run (ms)
    pub initial_spawn_interval_ms: f32,
    /// Interval multiplier applied on each level advance
    pub spawn_interval_decay: f32,
    /// Floor for the spawn interval (ms)
    pub min_spawn_interval_ms: f32,

    /// Gold chance = min(base + level * per_level, cap)
    pub gold_chance_base: f32,
    pub gold_chance_per_level: f32,
    pub gold_chance_cap: f32,

    /// Enemy base speed range (units per reference frame)
    pub enemy_speed_min: f32,
    pub enemy_speed_max: f32,
    /// Extra speed per level
    pub enemy_speed_per_level: f32,
    pub gold_speed_multiplier: f32,
    pub gold_size: f32,
    pub normal_base_size: f32,
    pub normal_size_per_level: f32,
    pub normal_size_bonus_cap: f32,

    pub normal_score: u64,
    pub gold_score: u64,

    /// Particle burst sizes
    pub tap_particles: usize,
    pub contact_particles: usize,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            level_duration_ms: 120_000.0,
            combo_window_ms: 900.0,
            combo_step: 0.22,
            combo_bonus_cap: 3.0,

            initial_spawn_interval_ms: 1200.0,
            spawn_interval_decay: 0.85,
            min_spawn_interval_ms: 420.0,

            gold_chance_base: 0.05,
            gold_chance_per_level: 0.03,
            gold_chance_cap: 0.40,

            enemy_speed_min: 0.6,
            enemy_speed_max: 1.6,
            enemy_speed_per_level: 0.05,
            gold_speed_multiplier: 1.2,
            gold_size: 34.0,
            normal_base_size: 22.0,
            normal_size_per_level: 2.0,
            normal_size_bonus_cap: 20.0,

            normal_score: 12,
            gold_score: 75,

            tap_particles: 18,
            contact_particles: 12,
        }
    }
}

impl Tuning {
    /// Base score awarded for killing an enemy of this kind
    pub fn base_score(&self, kind: EnemyKind) -> u64 {
        match kind {
            EnemyKind::Normal => self.normal_score,
            EnemyKind::Gold => self.gold_score,
        }
    }

    /// Combo multiplier: 1 + min(cap, (combo - 1) * step)
    pub fn combo_multiplier(&self, combo: u32) -> f64 {
        let steps = combo.saturating_sub(1) as f64;
        1.0 + (steps * self.combo_step).min(self.combo_bonus_cap)
    }

    /// Spawn interval after one level advance
    pub fn next_spawn_interval(&self, current_ms: f32) -> f32 {
        (current_ms * self.spawn_interval_decay).max(self.min_spawn_interval_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combo_multiplier_table() {
        let t = Tuning::default();
        assert_eq!(t.combo_multiplier(1), 1.0);
        assert!((t.combo_multiplier(5) - 1.88).abs() < 1e-9);
        assert_eq!(t.combo_multiplier(20), 4.0);
        // A zero combo (after a miss) never drops below 1x
        assert_eq!(t.combo_multiplier(0), 1.0);
    }

    #[test]
    fn test_spawn_interval_shrinks_to_floor() {
        let t = Tuning::default();
        let mut interval = t.initial_spawn_interval_ms;
        interval = t.next_spawn_interval(interval);
        assert!((interval - 1020.0).abs() < 1e-3);
        for _ in 0..20 {
            interval = t.next_spawn_interval(interval);
        }
        assert_eq!(interval, 420.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let t: Tuning = serde_json::from_str(r#"{"gold_score": 100}"#).unwrap();
        assert_eq!(t.gold_score, 100);
        assert_eq!(t.normal_score, 12);
        assert_eq!(t.level_duration_ms, 120_000.0);
    }
}
