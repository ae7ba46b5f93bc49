//! HUD readouts and transient messages
//!
//! Pure view-model code: everything the DOM shows is computed here from the
//! run state so the browser glue only copies strings into elements.

use serde::Serialize;

use crate::sim::{GameEvent, RunState, time_remaining_ms};

/// Text for every readout, recomputed after each frame/scoring event
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HudSnapshot {
    pub score: String,
    pub kills: String,
    pub level: String,
    pub combo: String,
    pub time_left: String,
    pub high_score: String,
    pub accuracy: String,
}

impl HudSnapshot {
    pub fn capture(state: &RunState, now: f64) -> Self {
        Self {
            score: state.level_score.to_string(),
            kills: state.kills.to_string(),
            level: state.level.to_string(),
            combo: format!("x{}", state.combo.max(1)),
            time_left: format_countdown(time_remaining_ms(state, now)),
            high_score: state.high_score.to_string(),
            accuracy: format!("{:.0}%", state.accuracy() * 100.0),
        }
    }
}

/// Format milliseconds as `MM:SS` (floored, negative clamps to zero)
pub fn format_countdown(ms: f64) -> String {
    let ms = if ms.is_finite() { ms.max(0.0) } else { 0.0 };
    let minutes = (ms / 60_000.0).floor() as u64;
    let seconds = ((ms % 60_000.0) / 1000.0).floor() as u64;
    format!("{minutes:02}:{seconds:02}")
}

/// Default on-screen time for a banner message (ms)
pub const MESSAGE_DURATION_MS: f64 = 1400.0;
/// Shorter banner after resuming (ms)
pub const RESUME_MESSAGE_MS: f64 = 900.0;
/// On-screen time for the high-score popup (ms)
pub const HIGH_SCORE_POPUP_MS: f64 = 2000.0;

/// A message that shows, fades, and disappears on its own
#[derive(Debug, Clone, PartialEq)]
pub struct Banner {
    pub text: String,
    pub shown_at: f64,
    pub duration_ms: f64,
}

impl Banner {
    pub fn new(text: impl Into<String>, now: f64, duration_ms: f64) -> Self {
        Self {
            text: text.into(),
            shown_at: now,
            duration_ms,
        }
    }

    pub fn is_visible(&self, now: f64) -> bool {
        now >= self.shown_at && now - self.shown_at < self.duration_ms
    }

    /// Fully opaque until shortly before it hides, then a linear fade
    pub fn opacity(&self, now: f64) -> f64 {
        if !self.is_visible(now) {
            return 0.0;
        }
        let fade_at = (self.duration_ms - 200.0).max(600.0).min(self.duration_ms);
        let age = now - self.shown_at;
        if age < fade_at {
            1.0
        } else {
            1.0 - (age - fade_at) / (self.duration_ms - fade_at)
        }
    }
}

/// Banner text and duration for events worth announcing
pub fn event_message(event: &GameEvent) -> Option<(&'static str, f64)> {
    let message = match event {
        GameEvent::Started { .. } => ("Game started - Good luck!", MESSAGE_DURATION_MS),
        GameEvent::Paused => ("Paused", MESSAGE_DURATION_MS),
        GameEvent::Resumed => ("Resumed", RESUME_MESSAGE_MS),
        GameEvent::Stopped => ("Game stopped", MESSAGE_DURATION_MS),
        GameEvent::ReturnedToStart => ("Back to start. Press START to play", MESSAGE_DURATION_MS),
        _ => return None,
    };
    Some(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::Progress;
    use crate::platform::storage::MemoryStore;
    use crate::sim::{pause, start};

    #[test]
    fn test_format_countdown() {
        assert_eq!(format_countdown(120_000.0), "02:00");
        assert_eq!(format_countdown(119_999.0), "01:59");
        assert_eq!(format_countdown(61_500.0), "01:01");
        assert_eq!(format_countdown(999.0), "00:00");
        assert_eq!(format_countdown(-50.0), "00:00");
        assert_eq!(format_countdown(f64::NAN), "00:00");
    }

    #[test]
    fn test_snapshot_readouts() {
        let mut state = RunState::new(1, 800.0, 600.0);
        let snap = HudSnapshot::capture(&state, 0.0);
        assert_eq!(snap.combo, "x1");
        assert_eq!(snap.time_left, "00:00");

        let progress = Progress::new(MemoryStore::default());
        start(&mut state, &progress, 1000.0);
        state.level_score = 42;
        state.combo = 3;
        state.kills = 5;
        let snap = HudSnapshot::capture(&state, 31_000.0);
        assert_eq!(snap.score, "42");
        assert_eq!(snap.kills, "5");
        assert_eq!(snap.level, "1");
        assert_eq!(snap.combo, "x3");
        assert_eq!(snap.time_left, "01:30");

        // Clock stays frozen while paused
        pause(&mut state, 31_000.0);
        let snap = HudSnapshot::capture(&state, 90_000.0);
        assert_eq!(snap.time_left, "01:30");
    }

    #[test]
    fn test_banner_fades_then_hides() {
        let banner = Banner::new("Paused", 1000.0, MESSAGE_DURATION_MS);
        assert!(banner.is_visible(1000.0));
        assert_eq!(banner.opacity(1500.0), 1.0);
        let mid = banner.opacity(1000.0 + 1300.0);
        assert!(mid > 0.0 && mid < 1.0);
        assert!(!banner.is_visible(2400.0));
        assert_eq!(banner.opacity(2400.0), 0.0);
    }

    #[test]
    fn test_short_banner_never_divides_by_zero() {
        let banner = Banner::new("Resumed", 0.0, 500.0);
        assert_eq!(banner.opacity(100.0), 1.0);
        assert_eq!(banner.opacity(499.0), 1.0);
    }

    #[test]
    fn test_event_messages() {
        assert_eq!(event_message(&GameEvent::Paused), Some(("Paused", MESSAGE_DURATION_MS)));
        assert_eq!(event_message(&GameEvent::Resumed), Some(("Resumed", 900.0)));
        assert_eq!(event_message(&GameEvent::TapMissed), None);
    }
}
