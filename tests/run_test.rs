use ant_survival::hud::HudSnapshot;
use ant_survival::persistence::{Progress, ProgressStore};
use ant_survival::platform::MemoryStore;
use ant_survival::sim::*;
use ant_survival::Tuning;
use glam::Vec2;

const DT: f64 = 16.0;

fn step(state: &mut RunState, progress: &mut Progress<MemoryStore>, now: &mut f64) {
    *now += DT;
    tick(state, &TickInput::default(), progress, *now, DT);
}

#[test]
fn test_full_level_lifecycle() {
    let mut state = RunState::new(7, 960.0, 540.0);
    let mut progress = Progress::new(MemoryStore::default());
    let mut now = 0.0;

    assert!(start(&mut state, &progress, now));
    assert_eq!(state.level, 1);

    // First ant arrives after one spawn interval
    for _ in 0..75 {
        step(&mut state, &mut progress, &mut now);
    }
    assert_eq!(state.enemies.len(), 1);

    let target = state.enemies[0].clone();
    let base = state.tuning.base_score(target.kind);
    match tap(&mut state, Some(target.pos), now) {
        TapOutcome::Hit { gained, combo, .. } => {
            assert_eq!(combo, 1);
            assert_eq!(gained, base);
        }
        other => panic!("expected a hit, got {other:?}"),
    }
    assert_eq!(state.level_score, base);

    // A miss breaks the combo but still counts as a shot
    assert_eq!(tap(&mut state, Some(Vec2::new(-500.0, -500.0)), now), TapOutcome::Miss);
    assert_eq!(state.combo, 0);
    assert_eq!((state.shots, state.hits), (2, 1));

    // Walk a gold ant straight into the player
    let player_pos = state.player.as_ref().map(|p| p.pos).unwrap_or_default();
    let id = state.next_entity_id();
    state.enemies.push(Enemy {
        id,
        pos: player_pos,
        kind: EnemyKind::Gold,
        size: 34.0,
        speed: 1.0,
        direction: -1.0,
    });
    step(&mut state, &mut progress, &mut now);
    assert!(state.enemies.iter().all(|e| e.id != id));
    assert_eq!(state.kills, 2);
    assert_eq!(state.level_score, base + 75);

    // Ten paused seconds do not count against the level clock
    let remaining = time_remaining_ms(&state, now);
    assert!(pause(&mut state, now));
    now += 10_000.0;
    step(&mut state, &mut progress, &mut now);
    assert!(resume(&mut state, now));
    assert_eq!(time_remaining_ms(&state, now), remaining);

    // Play out the rest of the level
    let mut frames = 0;
    while state.phase == RunPhase::Running && frames < 20_000 {
        step(&mut state, &mut progress, &mut now);
        frames += 1;
    }
    assert_eq!(state.phase, RunPhase::LevelComplete);
    assert_eq!(progress.load_level(), 2);
    assert_eq!(progress.load_high_score(), state.level_score);
    assert_eq!(state.high_score, state.level_score);

    let events = state.drain_events();
    assert!(events.contains(&GameEvent::NewHighScore {
        score: state.level_score
    }));
    assert!(events.contains(&GameEvent::LevelComplete {
        level: 1,
        score: state.level_score
    }));

    // Nothing moves while the popup is up
    let frozen = state.enemies.clone();
    step(&mut state, &mut progress, &mut now);
    assert_eq!(state.enemies, frozen);

    assert!(advance_level(&mut state, &mut progress, now));
    assert_eq!(state.level, 2);
    assert_eq!(state.level_score, 0);
    assert!(state.enemies.is_empty());
    assert!((state.spawn_interval_ms - 1020.0).abs() < 1e-3);

    assert!(stop(&mut state, &progress));
    assert_eq!(state.phase, RunPhase::Idle);
    assert!(state.player.is_none());
    assert_eq!(state.level, 2);
    assert_eq!(HudSnapshot::capture(&state, now).time_left, "00:00");
}

#[test]
fn test_high_score_requires_beating_stored_value() {
    let tuning = Tuning {
        level_duration_ms: 2_000.0,
        ..Tuning::default()
    };
    let mut state = RunState::with_tuning(3, 960.0, 540.0, tuning);
    let mut progress = Progress::new(MemoryStore::default());
    progress.save_high_score(1_000_000);

    let mut now = 0.0;
    start(&mut state, &progress, now);
    while state.phase == RunPhase::Running {
        step(&mut state, &mut progress, &mut now);
    }

    let events = state.drain_events();
    assert!(!events.iter().any(|e| matches!(e, GameEvent::NewHighScore { .. })));
    assert_eq!(progress.load_high_score(), 1_000_000);
    assert_eq!(progress.load_level(), 2);
}

#[test]
fn test_same_seed_same_run() {
    let run = |seed| {
        let mut state = RunState::new(seed, 960.0, 540.0);
        let mut progress = Progress::new(MemoryStore::default());
        let mut now = 0.0;
        start(&mut state, &progress, now);
        for _ in 0..1_000 {
            step(&mut state, &mut progress, &mut now);
        }
        state.enemies
    };
    let a = run(99);
    assert!(!a.is_empty());
    assert_eq!(a, run(99));
}

#[test]
fn test_back_to_start_keeps_unlocked_level() {
    let tuning = Tuning {
        level_duration_ms: 500.0,
        ..Tuning::default()
    };
    let mut state = RunState::with_tuning(5, 960.0, 540.0, tuning);
    let mut progress = Progress::new(MemoryStore::default());
    let mut now = 0.0;

    start(&mut state, &progress, now);
    while state.phase == RunPhase::Running {
        step(&mut state, &mut progress, &mut now);
    }
    assert!(back_to_start(&mut state, &progress));
    assert_eq!(state.phase, RunPhase::Idle);
    assert_eq!(state.level, 2);

    // Taps on the start screen do nothing
    assert_eq!(tap(&mut state, Some(Vec2::ZERO), now), TapOutcome::Ignored);
    assert_eq!(state.shots, 0);
}
