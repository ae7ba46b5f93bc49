//! Run lifecycle and level timer
//!
//! ```text
//! Idle -> Running <-> Paused
//! Running -> LevelComplete -> Running (next level)
//! Running | Paused | LevelComplete -> Idle (stop)
//! ```
//!
//! Every transition returns whether it actually happened so the driver can
//! ignore button presses that make no sense in the current phase.

use super::state::{GameEvent, Player, RunPhase, RunState};
use crate::persistence::ProgressStore;

/// Start a fresh run from the persisted level
pub fn start(state: &mut RunState, progress: &impl ProgressStore, now: f64) -> bool {
    if state.phase != RunPhase::Idle {
        return false;
    }

    state.level = progress.load_level().max(1);
    state.high_score = progress.load_high_score();
    state.level_score = 0;
    state.kills = 0;
    state.shots = 0;
    state.hits = 0;
    state.combo = 0;
    state.last_kill_at = None;
    state.spawn_interval_ms = state.tuning.initial_spawn_interval_ms;
    state.spawn_timer_ms = 0.0;
    state.player = Some(Player::new(state.canvas));
    state.clear_entities();
    state.level_started_at = Some(now);
    state.paused_at = None;
    state.phase = RunPhase::Running;

    log::info!("Run started at level {}", state.level);
    state.push_event(GameEvent::Started { level: state.level });
    true
}

pub fn pause(state: &mut RunState, now: f64) -> bool {
    if state.phase != RunPhase::Running {
        return false;
    }
    state.phase = RunPhase::Paused;
    state.paused_at = Some(now);
    state.push_event(GameEvent::Paused);
    true
}

/// Resume from a pause; the level timer does not count paused time
pub fn resume(state: &mut RunState, now: f64) -> bool {
    if state.phase != RunPhase::Paused {
        return false;
    }
    if let (Some(paused_at), Some(started)) = (state.paused_at.take(), state.level_started_at) {
        state.level_started_at = Some(started + (now - paused_at).max(0.0));
    }
    state.phase = RunPhase::Running;
    state.push_event(GameEvent::Resumed);
    true
}

/// Milliseconds left on the level clock (frozen while not running)
pub fn time_remaining_ms(state: &RunState, now: f64) -> f64 {
    let Some(started) = state.level_started_at else {
        return 0.0;
    };
    let at = match state.phase {
        RunPhase::Paused => state.paused_at.unwrap_or(now),
        _ => now,
    };
    (state.tuning.level_duration_ms - (at - started)).max(0.0)
}

/// Check the level clock; completes the level when it runs out
///
/// Returns true if the level completed on this call.
pub fn check_level_timer(state: &mut RunState, progress: &mut impl ProgressStore, now: f64) -> bool {
    if state.phase != RunPhase::Running || state.level_started_at.is_none() {
        return false;
    }
    if time_remaining_ms(state, now) > 0.0 {
        return false;
    }
    complete_level(state, progress);
    true
}

/// Unlock the next level, settle the high score, and wait for an advance
fn complete_level(state: &mut RunState, progress: &mut impl ProgressStore) {
    progress.save_level(state.level + 1);

    let stored_high = progress.load_high_score();
    if state.level_score > stored_high {
        progress.save_high_score(state.level_score);
        state.high_score = state.level_score;
        log::info!("New high score: {}", state.level_score);
        state.push_event(GameEvent::NewHighScore {
            score: state.level_score,
        });
    }

    state.phase = RunPhase::LevelComplete;
    log::info!(
        "Level {} complete with {} points",
        state.level,
        state.level_score
    );
    state.push_event(GameEvent::LevelComplete {
        level: state.level,
        score: state.level_score,
    });
}

/// Move on to the next level after a level-complete pause
pub fn advance_level(state: &mut RunState, progress: &mut impl ProgressStore, now: f64) -> bool {
    if state.phase != RunPhase::LevelComplete {
        return false;
    }
    state.level += 1;
    progress.save_level(state.level);
    state.level_score = 0;
    state.spawn_interval_ms = state.tuning.next_spawn_interval(state.spawn_interval_ms);
    state.clear_entities();
    state.level_started_at = Some(now);
    state.paused_at = None;
    state.phase = RunPhase::Running;

    log::info!(
        "Advanced to level {} (spawn every {:.0} ms)",
        state.level,
        state.spawn_interval_ms
    );
    state.push_event(GameEvent::LevelAdvanced { level: state.level });
    true
}

/// End the run and return to the start screen
///
/// The driver is responsible for cancelling its frame callback.
pub fn stop(state: &mut RunState, progress: &impl ProgressStore) -> bool {
    if state.phase == RunPhase::Idle {
        return false;
    }
    reset_to_idle(state, progress);
    log::info!("Run stopped");
    state.push_event(GameEvent::Stopped);
    true
}

/// Leave the level-complete popup for the start screen
///
/// Same reset as [`stop`], but the frame loop keeps running.
pub fn back_to_start(state: &mut RunState, progress: &impl ProgressStore) -> bool {
    if state.phase == RunPhase::Idle {
        return false;
    }
    reset_to_idle(state, progress);
    state.push_event(GameEvent::ReturnedToStart);
    true
}

/// Reset everything and start again from the persisted level
pub fn restart(state: &mut RunState, progress: &impl ProgressStore, now: f64) -> bool {
    if state.phase != RunPhase::Idle {
        reset_to_idle(state, progress);
    }
    start(state, progress, now)
}

fn reset_to_idle(state: &mut RunState, progress: &impl ProgressStore) {
    state.clear_entities();
    state.player = None;
    state.level_score = 0;
    state.kills = 0;
    state.combo = 0;
    state.last_kill_at = None;
    state.spawn_timer_ms = 0.0;
    state.spawn_interval_ms = state.tuning.initial_spawn_interval_ms;
    state.level = progress.load_level().max(1);
    state.level_started_at = None;
    state.paused_at = None;
    state.phase = RunPhase::Idle;
}
