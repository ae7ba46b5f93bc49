//! Movement input
//!
//! Keyboard and the on-screen joystick both reduce to a single movement
//! intent vector that the simulation consumes.

use glam::Vec2;

use crate::consts::DIAGONAL_SCALE;

/// Directional keys currently held
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl KeyState {
    /// Record a key press/release by DOM key name
    ///
    /// Returns false for keys that are not movement keys.
    pub fn set(&mut self, key: &str, pressed: bool) -> bool {
        let slot = match key {
            "ArrowUp" | "w" | "W" => &mut self.up,
            "ArrowDown" | "s" | "S" => &mut self.down,
            "ArrowLeft" | "a" | "A" => &mut self.left,
            "ArrowRight" | "d" | "D" => &mut self.right,
            _ => return false,
        };
        *slot = pressed;
        true
    }

    /// Release everything (window lost focus)
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Per-axis intent in {-1, 0, 1}; opposite keys cancel
    pub fn axes(&self) -> Vec2 {
        let axis = |neg: bool, pos: bool| (pos as i8 - neg as i8) as f32;
        Vec2::new(axis(self.left, self.right), axis(self.up, self.down))
    }
}

/// Virtual analog stick driven by a pointer dragged around a base
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Joystick {
    /// Base center (page coordinates)
    pub center: Vec2,
    /// Drag distance that maps to full deflection
    pub radius: f32,
    /// Deflections shorter than this fraction of `radius` read as zero
    pub dead_zone: f32,
    vector: Vec2,
    active: bool,
}

impl Joystick {
    pub fn new(center: Vec2, radius: f32, dead_zone: f32) -> Self {
        Self {
            center,
            radius: radius.max(1.0),
            dead_zone: dead_zone.clamp(0.0, 0.95),
            vector: Vec2::ZERO,
            active: false,
        }
    }

    /// Pointer went down on (or moved while holding) the stick
    pub fn drag_to(&mut self, pointer: Vec2) {
        self.active = true;
        let offset = (pointer - self.center) / self.radius;
        let offset = if offset.length() > 1.0 {
            offset.normalize()
        } else {
            offset
        };
        self.vector = if offset.length() < self.dead_zone {
            Vec2::ZERO
        } else {
            offset
        };
    }

    pub fn release(&mut self) {
        self.active = false;
        self.vector = Vec2::ZERO;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Current deflection, each axis in [-1, 1]
    pub fn vector(&self) -> Vec2 {
        self.vector
    }
}

/// Combine keyboard and joystick into one movement intent
///
/// Sources are summed and clamped per axis; if both axes end up nonzero each
/// is scaled by sqrt(2)/2 so diagonals are not faster than straight lines.
pub fn movement_intent(keys: &KeyState, joystick: Option<Vec2>) -> Vec2 {
    let stick = joystick
        .filter(|v| v.is_finite())
        .unwrap_or(Vec2::ZERO)
        .clamp(Vec2::NEG_ONE, Vec2::ONE);
    let mut intent = (keys.axes() + stick).clamp(Vec2::NEG_ONE, Vec2::ONE);
    if intent.x != 0.0 && intent.y != 0.0 {
        intent *= DIAGONAL_SCALE;
    }
    intent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        let mut keys = KeyState::default();
        assert!(keys.set("ArrowUp", true));
        assert!(keys.set("d", true));
        assert!(!keys.set("Enter", true));
        assert_eq!(keys.axes(), Vec2::new(1.0, -1.0));
        keys.set("ArrowUp", false);
        assert_eq!(keys.axes(), Vec2::new(1.0, 0.0));
    }

    #[test]
    fn test_opposite_keys_cancel() {
        let mut keys = KeyState::default();
        keys.set("ArrowLeft", true);
        keys.set("ArrowRight", true);
        keys.set("w", true);
        keys.set("s", true);
        assert_eq!(movement_intent(&keys, None), Vec2::ZERO);
    }

    #[test]
    fn test_diagonal_normalized() {
        let mut keys = KeyState::default();
        keys.set("a", true);
        keys.set("s", true);
        let intent = movement_intent(&keys, None);
        assert_eq!(intent, Vec2::new(-0.7071, 0.7071));
    }

    #[test]
    fn test_keyboard_and_joystick_sum_and_clamp() {
        let mut keys = KeyState::default();
        keys.set("ArrowRight", true);
        let intent = movement_intent(&keys, Some(Vec2::new(0.8, 0.0)));
        assert_eq!(intent, Vec2::new(1.0, 0.0));

        let intent = movement_intent(&keys, Some(Vec2::new(-1.0, 0.0)));
        assert_eq!(intent, Vec2::ZERO);

        let intent = movement_intent(&KeyState::default(), Some(Vec2::new(f32::NAN, 0.5)));
        assert_eq!(intent, Vec2::ZERO);
    }

    #[test]
    fn test_joystick_deflection() {
        let mut stick = Joystick::new(Vec2::new(100.0, 100.0), 50.0, 0.2);
        stick.drag_to(Vec2::new(125.0, 100.0));
        assert!(stick.is_active());
        assert_eq!(stick.vector(), Vec2::new(0.5, 0.0));

        // Beyond the rim saturates at unit length
        stick.drag_to(Vec2::new(100.0, 300.0));
        assert_eq!(stick.vector(), Vec2::new(0.0, 1.0));

        // Inside the dead zone
        stick.drag_to(Vec2::new(105.0, 100.0));
        assert_eq!(stick.vector(), Vec2::ZERO);

        stick.release();
        assert!(!stick.is_active());
        assert_eq!(stick.vector(), Vec2::ZERO);
    }
}
