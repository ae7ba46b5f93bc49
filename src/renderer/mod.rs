//! Rendering
//!
//! The frame is described as a flat list of [`DrawCmd`]s built from the run
//! state; the Canvas2D backend (wasm only) just executes the list. Each
//! entity picks a [`RenderStrategy`] from an explicit asset-readiness flag.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod sprites;

#[cfg(target_arch = "wasm32")]
pub use canvas::CanvasRenderer;

use glam::Vec2;

use crate::sim::{EnemyKind, Facing, Rect, RunPhase, RunState};

/// Colors for game elements (0xRRGGBB)
pub mod colors {
    pub const ANT_NORMAL: u32 = 0x111111;
    pub const ANT_GOLD: u32 = 0xffd66b;
    pub const PLAYER: u32 = 0x2f7de1;
    pub const PAUSE_OVERLAY: u32 = 0x000000;
    pub const PAUSE_TEXT: u32 = 0xffffff;
}

/// CSS hex string for a 0xRRGGBB color
pub fn css_color(color: u32) -> String {
    format!("#{:06x}", color & 0xff_ffff)
}

/// Image-backed sprites
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpriteId {
    Player,
    AntNormal,
    AntGold,
}

impl SpriteId {
    pub const ALL: [SpriteId; 3] = [SpriteId::Player, SpriteId::AntNormal, SpriteId::AntGold];

    /// Asset path relative to the page
    pub fn path(self) -> &'static str {
        match self {
            SpriteId::Player => "images/player.png",
            SpriteId::AntNormal => "images/enemy_black.png",
            SpriteId::AntGold => "images/enemy_golden.png",
        }
    }

    pub fn for_enemy(kind: EnemyKind) -> Self {
        match kind {
            EnemyKind::Normal => SpriteId::AntNormal,
            EnemyKind::Gold => SpriteId::AntGold,
        }
    }

    fn index(self) -> usize {
        match self {
            SpriteId::Player => 0,
            SpriteId::AntNormal => 1,
            SpriteId::AntGold => 2,
        }
    }
}

/// How an entity gets drawn this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStrategy {
    /// The image asset has loaded
    ImageSprite(SpriteId),
    /// Asset missing or failed; draw pixel-art blocks instead
    ProceduralFallback,
}

/// Readiness of each sprite image, flipped by load/error callbacks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpriteSheet {
    ready: [bool; 3],
}

impl SpriteSheet {
    pub fn set_ready(&mut self, sprite: SpriteId, ready: bool) {
        self.ready[sprite.index()] = ready;
    }

    pub fn is_ready(&self, sprite: SpriteId) -> bool {
        self.ready[sprite.index()]
    }

    pub fn strategy(&self, sprite: SpriteId) -> RenderStrategy {
        if self.is_ready(sprite) {
            RenderStrategy::ImageSprite(sprite)
        } else {
            RenderStrategy::ProceduralFallback
        }
    }
}

/// One drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    /// Clear the whole canvas
    Clear,
    /// Draw an image sprite into `rect`, optionally mirrored horizontally
    Image { sprite: SpriteId, rect: Rect, mirrored: bool },
    /// Solid block (pixel art, particles)
    Block { rect: Rect, color: u32, alpha: f32 },
    /// Soft elliptical glow
    Glow { center: Vec2, radius: Vec2, color: u32, alpha: f32 },
    /// Full-canvas tint
    Overlay { color: u32, alpha: f32 },
    /// Centered text
    Text { text: &'static str, center: Vec2, color: u32, size_px: f32 },
}

/// Render options derived from settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    pub gold_glow: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self { gold_glow: true }
    }
}

/// Build the draw list for one frame
///
/// Order matches the simulation: player, enemies (oldest first so the newest
/// is on top), particles, then the pause overlay.
pub fn draw_list(state: &RunState, sheet: &SpriteSheet, options: RenderOptions, now: f64) -> Vec<DrawCmd> {
    let mut cmds = vec![DrawCmd::Clear];

    if let Some(player) = &state.player {
        let mirrored = player.facing == Facing::Left;
        match sheet.strategy(SpriteId::Player) {
            RenderStrategy::ImageSprite(sprite) => cmds.push(DrawCmd::Image {
                sprite,
                rect: player.rect(),
                mirrored,
            }),
            RenderStrategy::ProceduralFallback => {
                cmds.extend(
                    sprites::player_blocks(player.pos, player.size, mirrored)
                        .into_iter()
                        .map(|rect| DrawCmd::Block {
                            rect,
                            color: colors::PLAYER,
                            alpha: 1.0,
                        }),
                );
            }
        }
    }

    for enemy in &state.enemies {
        match sheet.strategy(SpriteId::for_enemy(enemy.kind)) {
            RenderStrategy::ImageSprite(sprite) => cmds.push(DrawCmd::Image {
                sprite,
                rect: enemy.rect(),
                mirrored: false,
            }),
            RenderStrategy::ProceduralFallback => {
                let color = match enemy.kind {
                    EnemyKind::Normal => colors::ANT_NORMAL,
                    EnemyKind::Gold => colors::ANT_GOLD,
                };
                cmds.extend(
                    sprites::ant_blocks(enemy.pos, enemy.size)
                        .into_iter()
                        .map(|rect| DrawCmd::Block { rect, color, alpha: 1.0 }),
                );
                if enemy.kind == EnemyKind::Gold && options.gold_glow {
                    let s = enemy.size.round();
                    cmds.push(DrawCmd::Glow {
                        center: enemy.pos,
                        radius: Vec2::new(s * 0.9, s * 0.6),
                        color: colors::ANT_GOLD,
                        alpha: 0.12,
                    });
                }
            }
        }
    }

    for particle in &state.particles {
        let age = particle.age(now);
        if age > 1.0 {
            continue;
        }
        cmds.push(DrawCmd::Block {
            rect: Rect {
                x: particle.pos.x,
                y: particle.pos.y,
                w: particle.size,
                h: particle.size,
            },
            color: particle.color,
            alpha: (1.0 - age) as f32,
        });
    }

    if state.phase == RunPhase::Paused {
        cmds.push(DrawCmd::Overlay {
            color: colors::PAUSE_OVERLAY,
            alpha: 0.35,
        });
        cmds.push(DrawCmd::Text {
            text: "PAUSED",
            center: state.canvas / 2.0,
            color: colors::PAUSE_TEXT,
            size_px: 28.0,
        });
    }

    cmds
}
