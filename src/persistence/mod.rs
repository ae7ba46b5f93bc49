//! Saved progress: unlocked level and high score
//!
//! Two integers in a key-value store. Storage problems never reach the game:
//! reads fall back to defaults and failed writes are logged and dropped.

use crate::platform::storage::KeyValueStore;

/// Storage key for the unlocked level
pub const LEVEL_KEY: &str = "antSurvival_level";
/// Storage key for the best single-level score
pub const HIGH_SCORE_KEY: &str = "antSurvival_highscore";

/// What the simulation needs from persistence
pub trait ProgressStore {
    /// Unlocked level, 1 if absent or unreadable
    fn load_level(&self) -> u32;
    fn save_level(&mut self, level: u32);
    /// Best level score, 0 if absent or unreadable
    fn load_high_score(&self) -> u64;
    fn save_high_score(&mut self, score: u64);
}

/// [`ProgressStore`] over any key-value backend
#[derive(Debug, Clone)]
pub struct Progress<S> {
    store: S,
}

impl<S: KeyValueStore> Progress<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.store.get_item(key) {
            Ok(value) => value,
            Err(e) => {
                log::warn!("Failed to read {key}: {e}");
                None
            }
        }
    }

    fn write(&mut self, key: &str, value: &str) {
        if let Err(e) = self.store.set_item(key, value) {
            log::warn!("Failed to save {key}: {e}");
        }
    }
}

/// Parse a stored integer, tolerating surrounding whitespace
fn parse_stored<T: std::str::FromStr>(key: &str, raw: Option<String>) -> Option<T> {
    let raw = raw?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            log::warn!("Ignoring malformed {key} value {raw:?}");
            None
        }
    }
}

impl<S: KeyValueStore> ProgressStore for Progress<S> {
    fn load_level(&self) -> u32 {
        parse_stored::<u32>(LEVEL_KEY, self.read(LEVEL_KEY))
            .filter(|&level| level >= 1)
            .unwrap_or(1)
    }

    fn save_level(&mut self, level: u32) {
        self.write(LEVEL_KEY, &level.to_string());
    }

    fn load_high_score(&self) -> u64 {
        parse_stored(HIGH_SCORE_KEY, self.read(HIGH_SCORE_KEY)).unwrap_or(0)
    }

    fn save_high_score(&mut self, score: u64) {
        self.write(HIGH_SCORE_KEY, &score.to_string());
    }
}
