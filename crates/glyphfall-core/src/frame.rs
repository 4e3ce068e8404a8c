//! A steppable animation-frame scheduler.
//!
//! Mirrors `requestAnimationFrame`: a callback asks for the next frame, the
//! host later calls [`FrameLoop::begin`] with a timestamp. Nothing runs on
//! its own, so tests drive frames with made-up timestamps.

use crate::Millis;

#[derive(Debug, Clone, Default)]
pub struct FrameLoop {
    requested: bool,
    last_ts: Option<Millis>,
    frames: u64,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for one more frame.
    pub fn request(&mut self) {
        self.requested = true;
    }

    /// Drop a pending request.
    pub fn cancel(&mut self) {
        self.requested = false;
    }

    pub fn is_requested(&self) -> bool {
        self.requested
    }

    /// Number of frames that have run.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Consume the pending request at `ts`.
    ///
    /// Returns the time elapsed since the previous frame (0 for the first
    /// one), or `None` if no frame was requested. Timestamps going backwards
    /// count as no elapsed time.
    pub fn begin(&mut self, ts: Millis) -> Option<Millis> {
        if !self.requested {
            return None;
        }
        self.requested = false;
        let elapsed = self.last_ts.map_or(0, |last| ts.saturating_sub(last));
        self.last_ts = Some(ts);
        self.frames += 1;
        Some(elapsed)
    }
}
