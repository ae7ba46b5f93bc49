//! Per-frame simulation tick
//!
//! Advances the run by one display frame of variable length. Order within a
//! frame: level timer, player, spawn cadence, enemies (motion, contact,
//! culling), particles.

use glam::Vec2;

use super::collision::resolve_contact;
use super::level::check_level_timer;
use super::spawn::spawn_enemy;
use super::state::{GameEvent, RunState};
use crate::persistence::ProgressStore;

/// Input sampled for a single frame
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickInput {
    /// Combined keyboard + joystick movement intent, each axis in [-1, 1]
    pub movement: Vec2,
}

/// Advance the run by `dt_ms` ending at timestamp `now`
///
/// A no-op unless the run is [`Running`](super::RunPhase::Running).
pub fn tick(
    state: &mut RunState,
    input: &TickInput,
    progress: &mut impl ProgressStore,
    now: f64,
    dt_ms: f64,
) {
    if !state.is_running() {
        return;
    }
    if check_level_timer(state, progress, now) {
        return;
    }

    let dt = dt_ms.max(0.0) as f32;
    let canvas = state.canvas;

    if let Some(player) = state.player.as_mut() {
        player.update(input.movement, dt, canvas);
    }

    update_spawner(state, dt);
    update_enemies(state, dt, now);
    update_particles(state, dt, now);
}

/// Accumulate frame time and spawn one enemy per elapsed interval
fn update_spawner(state: &mut RunState, dt: f32) {
    state.spawn_timer_ms += dt;
    if state.spawn_timer_ms < state.spawn_interval_ms {
        return;
    }
    state.spawn_timer_ms = 0.0;

    let id = state.next_entity_id();
    let enemy = spawn_enemy(&mut state.rng, &state.tuning, id, state.level, state.canvas);
    log::debug!(
        "Spawned {:?} ant #{} at y={:.0} (size {:.0})",
        enemy.kind,
        id,
        enemy.pos.y,
        enemy.size
    );
    state.push_event(GameEvent::EnemySpawned { id, kind: enemy.kind });
    state.enemies.push(enemy);
}

/// Move, contact-test and cull enemies (reverse order so removal is safe)
fn update_enemies(state: &mut RunState, dt: f32, now: f64) {
    let speed_per_level = state.tuning.enemy_speed_per_level;
    for i in (0..state.enemies.len()).rev() {
        state.enemies[i].update(dt, state.level, speed_per_level);

        if resolve_contact(state, i, now) {
            continue;
        }
        if state.enemies[i].is_off_screen(state.canvas.x) {
            state.enemies.remove(i);
        }
    }
}

fn update_particles(state: &mut RunState, dt: f32, now: f64) {
    for particle in state.particles.iter_mut() {
        particle.update(dt);
    }
    state.particles.retain(|p| !p.is_expired(now));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::Progress;
    use crate::platform::storage::MemoryStore;
    use crate::sim::collision::{TapOutcome, tap};
    use crate::sim::level::{pause, start};
    use crate::sim::state::{Enemy, EnemyKind, RunPhase};
    use proptest::prelude::*;

    const DT: f64 = 16.0;

    fn running() -> (RunState, Progress<MemoryStore>) {
        let mut state = RunState::new(2024, 800.0, 600.0);
        let progress = Progress::new(MemoryStore::default());
        start(&mut state, &progress, 0.0);
        state.drain_events();
        (state, progress)
    }

    /// Step `frames` frames of `DT` starting after `*now`
    fn run_frames(state: &mut RunState, progress: &mut Progress<MemoryStore>, now: &mut f64, frames: usize) {
        let input = TickInput::default();
        for _ in 0..frames {
            *now += DT;
            tick(state, &input, progress, *now, DT);
        }
    }

    #[test]
    fn test_idle_tick_is_noop() {
        let mut state = RunState::new(1, 800.0, 600.0);
        let mut progress = Progress::new(MemoryStore::default());
        tick(&mut state, &TickInput::default(), &mut progress, 5000.0, 5000.0);
        assert_eq!(state.spawn_timer_ms, 0.0);
        assert!(state.enemies.is_empty());
    }

    #[test]
    fn test_spawn_after_interval() {
        let (mut state, mut progress) = running();
        let input = TickInput::default();
        tick(&mut state, &input, &mut progress, 1199.0, 1199.0);
        assert!(state.enemies.is_empty());
        tick(&mut state, &input, &mut progress, 1200.0, 1.0);
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.spawn_timer_ms, 0.0);
        assert!(matches!(
            state.drain_events().as_slice(),
            [GameEvent::EnemySpawned { .. }]
        ));
    }

    #[test]
    fn test_paused_tick_freezes_everything() {
        let (mut state, mut progress) = running();
        state.enemies.push(Enemy {
            id: 99,
            pos: Vec2::new(400.0, 300.0),
            kind: EnemyKind::Normal,
            size: 24.0,
            speed: 1.0,
            direction: -1.0,
        });
        pause(&mut state, 100.0);
        let mut now = 100.0;
        run_frames(&mut state, &mut progress, &mut now, 200);
        assert_eq!(state.enemies[0].pos.x, 400.0);
        assert_eq!(state.spawn_timer_ms, 0.0);
        assert_eq!(state.phase, RunPhase::Paused);
    }

    #[test]
    fn test_enemy_culled_past_left_edge() {
        let (mut state, mut progress) = running();
        state.spawn_interval_ms = f32::MAX;
        state.enemies.push(Enemy {
            id: 99,
            pos: Vec2::new(-79.5, 30.0),
            kind: EnemyKind::Normal,
            size: 24.0,
            speed: 1.0,
            direction: -1.0,
        });
        let mut now = 0.0;
        run_frames(&mut state, &mut progress, &mut now, 1);
        assert!(state.enemies.is_empty());
        assert_eq!(state.kills, 0);
    }

    #[test]
    fn test_contact_kill_during_tick() {
        let (mut state, mut progress) = running();
        state.spawn_interval_ms = f32::MAX;
        state.combo = 6;
        let at = state.player.as_ref().unwrap().pos;
        state.enemies.push(Enemy {
            id: 99,
            pos: at + Vec2::new(10.0, 0.0),
            kind: EnemyKind::Gold,
            size: 34.0,
            speed: 1.0,
            direction: -1.0,
        });
        let mut now = 0.0;
        run_frames(&mut state, &mut progress, &mut now, 1);
        assert!(state.enemies.is_empty());
        assert_eq!(state.level_score, 75);
        assert_eq!(state.kills, 1);
        assert_eq!(state.particles.len(), 12);
    }

    #[test]
    fn test_particles_expire() {
        let (mut state, mut progress) = running();
        state.spawn_interval_ms = f32::MAX;
        state.emit_particles(Vec2::new(400.0, 300.0), 20.0, 0x222222, 18, 0.0);
        let mut now = 0.0;
        run_frames(&mut state, &mut progress, &mut now, 10);
        assert_eq!(state.particles.len(), 18);
        // Every particle lives less than 1000 ms
        run_frames(&mut state, &mut progress, &mut now, 70);
        assert!(state.particles.is_empty());
    }

    #[test]
    fn test_level_timer_stops_gameplay() {
        let (mut state, mut progress) = running();
        let input = TickInput::default();
        tick(&mut state, &input, &mut progress, 119_990.0, 16.0);
        assert_eq!(state.phase, RunPhase::Running);
        tick(&mut state, &input, &mut progress, 120_000.0, 10.0);
        assert_eq!(state.phase, RunPhase::LevelComplete);
        let timer = state.spawn_timer_ms;
        tick(&mut state, &input, &mut progress, 120_016.0, 16.0);
        assert_eq!(state.spawn_timer_ms, timer);
        assert_eq!(progress.load_level(), 2);
    }

    #[test]
    fn test_end_to_end_first_spawn_and_tap() {
        let (mut state, mut progress) = running();
        assert_eq!(state.spawn_interval_ms, 1200.0);

        let mut now = 0.0;
        // 75 frames of 16 ms = 1200 ms: exactly one rollover
        run_frames(&mut state, &mut progress, &mut now, 75);
        assert_eq!(state.enemies.len(), 1);

        let enemy = state.enemies[0].clone();
        let base = state.tuning.base_score(enemy.kind);
        let outcome = tap(&mut state, Some(enemy.pos), now);
        assert_eq!(
            outcome,
            TapOutcome::Hit {
                kind: enemy.kind,
                gained: base,
                combo: 1
            }
        );
        assert_eq!(state.kills, 1);
        assert_eq!(state.combo, 1);
        assert_eq!(state.level_score, base);
    }

    proptest! {
        #[test]
        fn prop_enemy_moves_left_at_fixed_rate(
            speed in 0.6f32..1.92,
            level in 1u32..30,
            dt in 1.0f32..50.0,
            steps in 1usize..40,
        ) {
            let mut enemy = Enemy {
                id: 1,
                pos: Vec2::new(1000.0, 100.0),
                kind: EnemyKind::Normal,
                size: 24.0,
                speed,
                direction: -1.0,
            };
            let step = (speed + level as f32 * 0.05) * (dt / 16.0);
            let mut prev = enemy.pos.x;
            for _ in 0..steps {
                enemy.update(dt, level, 0.05);
                prop_assert!(enemy.pos.x < prev);
                prop_assert!(((prev - enemy.pos.x) - step).abs() < 1e-3);
                prev = enemy.pos.x;
            }
        }

        #[test]
        fn prop_player_stays_on_canvas(
            moves in proptest::collection::vec((-1.0f32..=1.0, -1.0f32..=1.0, 0.1f32..100.0), 1..60),
            w in 60.0f32..2000.0,
            h in 60.0f32..2000.0,
        ) {
            let (mut state, mut progress) = running();
            state.resize(w, h);
            state.spawn_interval_ms = f32::MAX;
            let mut now = 0.0;
            for (x, y, dt) in moves {
                now += dt as f64;
                let input = TickInput { movement: Vec2::new(x, y) };
                tick(&mut state, &input, &mut progress, now, dt as f64);
                let p = state.player.as_ref().unwrap();
                let half = p.size / 2.0;
                prop_assert!(p.pos.x >= half && p.pos.x <= w - half);
                prop_assert!(p.pos.y >= half && p.pos.y <= h - half);
            }
        }
    }
}
