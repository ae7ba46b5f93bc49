//! Frame timing

use crate::consts::MIN_FRAME_DT_MS;

/// Measures elapsed time between animation frames
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<f64>,
}

impl FrameClock {
    /// Elapsed ms since the previous frame, never below `MIN_FRAME_DT_MS`
    ///
    /// The first frame after construction or [`reset`](Self::reset) reports
    /// the minimum delta.
    pub fn advance(&mut self, now: f64) -> f64 {
        let dt = match self.last {
            Some(last) => now - last,
            None => 0.0,
        };
        self.last = Some(now);
        dt.max(MIN_FRAME_DT_MS)
    }

    /// Forget the previous frame (e.g. on resume, so a pause is not one huge frame)
    pub fn reset(&mut self) {
        self.last = None;
    }
}
