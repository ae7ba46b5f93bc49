//! Run state and core simulation types
//!
//! Everything the tick driver mutates lives in [`RunState`]; there is no
//! ambient game state anywhere else in the crate.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use crate::consts::*;
use crate::tuning::Tuning;

/// Lifecycle phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunPhase {
    /// No run in progress (start screen)
    #[default]
    Idle,
    /// Active gameplay
    Running,
    /// Paused by the player
    Paused,
    /// Level timer expired, waiting for an explicit advance
    LevelComplete,
}

/// Enemy variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EnemyKind {
    #[default]
    Normal,
    Gold,
}

impl EnemyKind {
    /// Particle color (0xRRGGBB) for kill bursts
    pub fn particle_color(self) -> u32 {
        match self {
            EnemyKind::Normal => 0x222222,
            EnemyKind::Gold => 0xffd66b,
        }
    }
}

/// An ant drifting across the playfield
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    /// Center position
    pub pos: Vec2,
    pub kind: EnemyKind,
    /// Edge length of the square hitbox (px)
    pub size: f32,
    /// Base speed in units per reference frame
    pub speed: f32,
    /// Horizontal direction of travel (-1 = leftward)
    pub direction: f32,
}

impl Enemy {
    /// Advance horizontally; effective speed grows slightly with level
    pub fn update(&mut self, dt_ms: f32, level: u32, speed_per_level: f32) {
        let speed = self.speed + level as f32 * speed_per_level;
        self.pos.x += self.direction * speed * (dt_ms / REFERENCE_FRAME_MS);
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }

    /// True once the enemy has left the playfield horizontally
    pub fn is_off_screen(&self, canvas_width: f32) -> bool {
        self.pos.x < -OFFSCREEN_MARGIN || self.pos.x > canvas_width + OFFSCREEN_MARGIN
    }
}

/// A particle for visual effects (never affects gameplay)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    /// Velocity in units per reference frame
    pub vel: Vec2,
    /// 0xRRGGBB
    pub color: u32,
    /// Creation timestamp (ms)
    pub born_at: f64,
    /// Lifetime (ms)
    pub life_ms: f64,
    pub size: f32,
}

/// Downward drift added to particle velocity per reference frame
const PARTICLE_GRAVITY: f32 = 0.03;

impl Particle {
    /// Random debris around `center`, spread over a square of edge `spread`
    pub fn debris<R: Rng + ?Sized>(rng: &mut R, center: Vec2, spread: f32, color: u32, now: f64) -> Self {
        let jitter = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5) * spread;
        Self {
            pos: center + jitter,
            // Biased upward so bursts "pop" before gravity pulls them down
            vel: Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.9) * 3.5,
            color,
            born_at: now,
            life_ms: 600.0 + rng.random::<f64>() * 400.0,
            size: 2.0 + rng.random::<f32>() * 3.0,
        }
    }

    pub fn update(&mut self, dt_ms: f32) {
        let frames = dt_ms / REFERENCE_FRAME_MS;
        self.pos += self.vel * frames;
        self.vel.y += PARTICLE_GRAVITY * frames;
    }

    /// Fraction of lifetime elapsed (0 = fresh, >1 = expired)
    pub fn age(&self, now: f64) -> f64 {
        if self.life_ms <= 0.0 {
            return f64::INFINITY;
        }
        ((now - self.born_at) / self.life_ms).max(0.0)
    }

    pub fn is_expired(&self, now: f64) -> bool {
        now - self.born_at > self.life_ms
    }
}

/// Horizontal facing, used only to mirror the sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// The player's avatar
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    /// Center position
    pub pos: Vec2,
    pub size: f32,
    /// Units per reference frame at full intent
    pub speed: f32,
    pub facing: Facing,
}

impl Player {
    /// Spawn at the left side of the canvas, vertically centered
    pub fn new(canvas: Vec2) -> Self {
        let mut player = Self {
            pos: Vec2::new(canvas.x * PLAYER_START_X, canvas.y * PLAYER_START_Y),
            size: PLAYER_SIZE,
            speed: PLAYER_SPEED,
            facing: Facing::Right,
        };
        player.clamp_to(canvas);
        player
    }

    /// Move by a movement intent (each axis in [-1, 1]) over `dt_ms`
    pub fn update(&mut self, intent: Vec2, dt_ms: f32, canvas: Vec2) {
        self.pos += intent * self.speed * (dt_ms / REFERENCE_FRAME_MS);
        if intent.x < 0.0 {
            self.facing = Facing::Left;
        } else if intent.x > 0.0 {
            self.facing = Facing::Right;
        }
        self.clamp_to(canvas);
    }

    /// Keep the bounding box fully inside the canvas
    pub fn clamp_to(&mut self, canvas: Vec2) {
        let half = self.size / 2.0;
        // A canvas smaller than the player pins it to the near edge
        self.pos.x = self.pos.x.min(canvas.x - half).max(half);
        self.pos.y = self.pos.y.min(canvas.y - half).max(half);
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }
}

/// Discrete things that happened during a tick or input event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started { level: u32 },
    Paused,
    Resumed,
    EnemySpawned { id: u32, kind: EnemyKind },
    EnemyTapped { kind: EnemyKind, gained: u64, combo: u32 },
    EnemyTouched { kind: EnemyKind, gained: u64 },
    TapMissed,
    LevelComplete { level: u32, score: u64 },
    NewHighScore { score: u64 },
    LevelAdvanced { level: u32 },
    Stopped,
    ReturnedToStart,
}

/// Default cap on live particles
pub const MAX_PARTICLES: usize = 512;

/// Complete run state owned by the tick driver
#[derive(Debug, Clone)]
pub struct RunState {
    /// Seed the RNG was created from
    pub seed: u64,
    pub(crate) rng: Pcg32,
    pub tuning: Tuning,
    /// Canvas size in px
    pub canvas: Vec2,
    pub phase: RunPhase,
    /// Current level (>= 1)
    pub level: u32,
    /// Score for the current level only
    pub level_score: u64,
    pub kills: u32,
    /// Taps made while running
    pub shots: u32,
    /// Kills from either channel
    pub hits: u32,
    pub combo: u32,
    pub last_kill_at: Option<f64>,
    pub spawn_timer_ms: f32,
    pub spawn_interval_ms: f32,
    pub level_started_at: Option<f64>,
    /// Set while paused so the level timer can be shifted on resume
    pub paused_at: Option<f64>,
    /// Last known persisted high score (for readouts)
    pub high_score: u64,
    pub max_particles: usize,
    pub player: Option<Player>,
    /// Live enemies, oldest first (newest is drawn on top)
    pub enemies: Vec<Enemy>,
    pub particles: Vec<Particle>,
    events: Vec<GameEvent>,
    next_id: u32,
}

impl RunState {
    /// Create an idle run for a canvas of the given size
    pub fn new(seed: u64, canvas_width: f32, canvas_height: f32) -> Self {
        Self::with_tuning(seed, canvas_width, canvas_height, Tuning::default())
    }

    pub fn with_tuning(seed: u64, canvas_width: f32, canvas_height: f32, tuning: Tuning) -> Self {
        let spawn_interval_ms = tuning.initial_spawn_interval_ms;
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
            canvas: Vec2::new(canvas_width.max(0.0), canvas_height.max(0.0)),
            phase: RunPhase::Idle,
            level: 1,
            level_score: 0,
            kills: 0,
            shots: 0,
            hits: 0,
            combo: 0,
            last_kill_at: None,
            spawn_timer_ms: 0.0,
            spawn_interval_ms,
            level_started_at: None,
            paused_at: None,
            high_score: 0,
            max_particles: MAX_PARTICLES,
            player: None,
            enemies: Vec::new(),
            particles: Vec::new(),
            events: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    pub fn is_running(&self) -> bool {
        self.phase == RunPhase::Running
    }

    /// Canvas was resized; keep the player inside the new bounds
    pub fn resize(&mut self, canvas_width: f32, canvas_height: f32) {
        self.canvas = Vec2::new(canvas_width.max(0.0), canvas_height.max(0.0));
        if let Some(player) = self.player.as_mut() {
            player.clamp_to(self.canvas);
        }
    }

    /// Hits over shots; 0 when no shots were taken
    pub fn accuracy(&self) -> f32 {
        if self.shots == 0 {
            0.0
        } else {
            self.hits as f32 / self.shots as f32
        }
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Emit a burst of kill debris, respecting the particle cap
    pub fn emit_particles(&mut self, center: Vec2, spread: f32, color: u32, count: usize, now: f64) {
        let room = self.max_particles.saturating_sub(self.particles.len());
        for _ in 0..count.min(room) {
            let particle = Particle::debris(&mut self.rng, center, spread, color, now);
            self.particles.push(particle);
        }
    }

    pub(crate) fn clear_entities(&mut self) {
        self.enemies.clear();
        self.particles.clear();
    }
}
