//! Axis-aligned box collision and kill resolution
//!
//! Two kill channels share the scoring rules here:
//! - taps/clicks hit-test a point against enemy boxes (combo applies)
//! - contact between the player box and an enemy box (flat score)

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Enemy, EnemyKind, GameEvent, RunState};

/// Axis-aligned rectangle (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    /// Square of edge `size` centered on `center`
    pub fn centered(center: Vec2, size: f32) -> Self {
        Self {
            x: center.x - size / 2.0,
            y: center.y - size / 2.0,
            w: size,
            h: size,
        }
    }

    /// Point containment, edges inclusive
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.x + self.w && p.y >= self.y && p.y <= self.y + self.h
    }

    /// Strict overlap (touching edges do not count)
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }
}

/// Index of the topmost (most recently spawned) enemy under `point`
pub fn hit_test(enemies: &[Enemy], point: Vec2) -> Option<usize> {
    enemies.iter().rposition(|e| e.rect().contains(point))
}

/// Result of a tap on the canvas
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TapOutcome {
    /// Tap killed an enemy
    Hit { kind: EnemyKind, gained: u64, combo: u32 },
    /// Tap landed on empty ground; combo broken
    Miss,
    /// Not running, or the event carried no coordinates
    Ignored,
}

/// Resolve a tap/click at a canvas-local point
///
/// `point` is `None` when the input event had no usable coordinates; such
/// events are ignored without touching any state.
pub fn tap(state: &mut RunState, point: Option<Vec2>, now: f64) -> TapOutcome {
    if !state.is_running() {
        return TapOutcome::Ignored;
    }
    let Some(point) = point else {
        return TapOutcome::Ignored;
    };
    state.shots += 1;

    let Some(index) = hit_test(&state.enemies, point) else {
        state.combo = 0;
        state.push_event(GameEvent::TapMissed);
        return TapOutcome::Miss;
    };

    let enemy = state.enemies.remove(index);
    state.hits += 1;

    let in_window = state
        .last_kill_at
        .is_some_and(|t| now - t <= state.tuning.combo_window_ms);
    state.combo = if in_window { state.combo + 1 } else { 1 };
    state.last_kill_at = Some(now);

    let multiplier = state.tuning.combo_multiplier(state.combo);
    let gained = (state.tuning.base_score(enemy.kind) as f64 * multiplier).floor() as u64;
    state.level_score += gained;
    state.kills += 1;

    let count = state.tuning.tap_particles;
    state.emit_particles(enemy.pos, enemy.size, enemy.kind.particle_color(), count, now);

    log::debug!(
        "Tapped {:?} ant #{} for {} (combo {})",
        enemy.kind,
        enemy.id,
        gained,
        state.combo
    );
    state.push_event(GameEvent::EnemyTapped {
        kind: enemy.kind,
        gained,
        combo: state.combo,
    });

    TapOutcome::Hit {
        kind: enemy.kind,
        gained,
        combo: state.combo,
    }
}

/// Contact kill of the enemy at `index` if it overlaps the player
///
/// Returns true if the enemy was removed. Contact kills are flat-rate: the
/// combo multiplier never applies and the combo counter is left alone.
pub fn resolve_contact(state: &mut RunState, index: usize, now: f64) -> bool {
    let Some(player_rect) = state.player.as_ref().map(|p| p.rect()) else {
        return false;
    };
    let touching = state
        .enemies
        .get(index)
        .is_some_and(|e| player_rect.overlaps(&e.rect()));
    if !touching {
        return false;
    }

    let enemy = state.enemies.remove(index);
    let gained = state.tuning.base_score(enemy.kind);
    state.kills += 1;
    state.hits += 1;
    state.level_score += gained;

    let count = state.tuning.contact_particles;
    state.emit_particles(enemy.pos, enemy.size, enemy.kind.particle_color(), count, now);

    log::debug!("Player squashed {:?} ant #{} for {}", enemy.kind, enemy.id, gained);
    state.push_event(GameEvent::EnemyTouched {
        kind: enemy.kind,
        gained,
    });
    true
}
