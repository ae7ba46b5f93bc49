//! Procedural pixel-art fallbacks
//!
//! Used whenever a sprite image has not loaded (or failed to), so entities
//! never render blank.

use glam::Vec2;

use crate::sim::Rect;

/// Ant silhouette, 1 = filled block
const ANT_MAP: [[u8; 5]; 7] = [
    [0, 1, 1, 1, 0],
    [1, 1, 1, 1, 1],
    [0, 1, 1, 1, 0],
    [0, 0, 1, 0, 0],
    [1, 0, 1, 0, 1],
    [1, 0, 1, 0, 1],
    [0, 1, 0, 1, 0],
];

/// Player silhouette (facing right)
const PLAYER_MAP: [[u8; 6]; 6] = [
    [0, 0, 1, 1, 0, 0],
    [0, 1, 1, 1, 1, 1],
    [1, 1, 1, 1, 0, 0],
    [1, 1, 1, 1, 1, 1],
    [0, 1, 1, 1, 1, 0],
    [0, 1, 0, 0, 1, 0],
];

/// Gap factor between blocks
const BLOCK_SPACING: f32 = 1.05;

/// Lay out the filled cells of `map` as square blocks around `center`
///
/// `anchor` is the (column, row) cell that sits on the center point.
fn blocks<const W: usize, const H: usize>(
    map: &[[u8; W]; H],
    center: Vec2,
    block: f32,
    anchor: (f32, f32),
    mirrored: bool,
) -> Vec<Rect> {
    let step = block * BLOCK_SPACING;
    let mut rects = Vec::new();
    for (r, row) in map.iter().enumerate() {
        for (c, &cell) in row.iter().enumerate() {
            if cell == 0 {
                continue;
            }
            let col = if mirrored { W - 1 - c } else { c };
            rects.push(Rect {
                x: center.x + (col as f32 - anchor.0) * step,
                y: center.y + (r as f32 - anchor.1) * step,
                w: block,
                h: block,
            });
        }
    }
    rects
}

/// Fallback ant blocks for an ant of edge `size` centered at `center`
pub fn ant_blocks(center: Vec2, size: f32) -> Vec<Rect> {
    blocks(&ANT_MAP, center, size.round() / 6.0, (2.0, 3.0), false)
}

/// Fallback player blocks, mirrored when facing left
pub fn player_blocks(center: Vec2, size: f32, mirrored: bool) -> Vec<Rect> {
    blocks(&PLAYER_MAP, center, size.round() / 6.5, (2.5, 2.5), mirrored)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled<const W: usize, const H: usize>(map: &[[u8; W]; H]) -> usize {
        map.iter().flatten().filter(|&&c| c == 1).count()
    }

    #[test]
    fn test_ant_block_count_and_size() {
        let rects = ant_blocks(Vec2::new(100.0, 100.0), 24.0);
        assert_eq!(rects.len(), filled(&ANT_MAP));
        assert!(rects.iter().all(|r| r.w == 4.0 && r.h == 4.0));
    }

    #[test]
    fn test_ant_blocks_are_deterministic() {
        let a = ant_blocks(Vec2::new(50.0, 60.0), 34.0);
        let b = ant_blocks(Vec2::new(50.0, 60.0), 34.0);
        assert_eq!(a, b);
    }

    #[test]
    fn test_ant_head_centered_above() {
        let center = Vec2::new(100.0, 100.0);
        let rects = ant_blocks(center, 24.0);
        // First block is row 0, column 1
        let step = 4.0 * BLOCK_SPACING;
        assert!((rects[0].x - (center.x - step)).abs() < 1e-4);
        assert!((rects[0].y - (center.y - 3.0 * step)).abs() < 1e-4);
    }

    #[test]
    fn test_player_mirror_flips_horizontally() {
        let center = Vec2::new(200.0, 200.0);
        let right = player_blocks(center, 48.0, false);
        let left = player_blocks(center, 48.0, true);
        assert_eq!(right.len(), left.len());
        assert_eq!(right.len(), filled(&PLAYER_MAP));
        // Mirrored layout reflects around the anchor column
        let block = 48.0 / 6.5;
        for (r, l) in right.iter().zip(&left) {
            assert_eq!(r.y, l.y);
            let mid = center.x + block / 2.0;
            assert!(((r.x + block / 2.0 - mid) + (l.x + block / 2.0 - mid)).abs() < 1e-3);
        }
    }
}
