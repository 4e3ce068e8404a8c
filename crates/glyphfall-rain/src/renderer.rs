//! Frame loop driving the rain field.

use glyphfall_config::RainConfig;
use glyphfall_core::{FrameLoop, Millis, MotionPreference, Viewport};
use rand::Rng;
use tracing::{debug, trace};

use crate::field::RainField;
use crate::surface::{Font, Surface};

/// What happened when a frame was offered to the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// No frame was pending.
    Idle,
    /// A frame was drawn; `rescheduled` tells whether another is pending.
    Drawn { rescheduled: bool },
}

/// Owns the rain field and its self-rescheduling frame loop.
///
/// Under reduced motion exactly one frame is drawn and the loop stops.
#[derive(Debug, Clone)]
pub struct RainRenderer {
    field: RainField,
    frames: FrameLoop,
    motion: MotionPreference,
    font: Font,
}

impl RainRenderer {
    pub fn new(config: &RainConfig, font: Font, motion: MotionPreference) -> Self {
        Self {
            field: RainField::new(config),
            frames: FrameLoop::new(),
            motion,
            font,
        }
    }

    /// Size the surface and columns, then request the first frame.
    pub fn start<S, R>(&mut self, viewport: Viewport, surface: &mut S, rng: &mut R)
    where
        S: Surface + ?Sized,
        R: Rng + ?Sized,
    {
        self.resize(viewport, surface, rng);
        self.frames.request();
        debug!(font = %self.font, motion = ?self.motion, "rain started");
    }

    /// Match the surface and columns to a new viewport.
    pub fn resize<S, R>(&mut self, viewport: Viewport, surface: &mut S, rng: &mut R)
    where
        S: Surface + ?Sized,
        R: Rng + ?Sized,
    {
        surface.resize(viewport);
        self.field.resize(viewport, rng);
    }

    /// Run the pending frame at timestamp `ts`, if any.
    pub fn on_frame<S, R>(&mut self, ts: Millis, surface: &mut S, rng: &mut R) -> FrameOutcome
    where
        S: Surface + ?Sized,
        R: Rng + ?Sized,
    {
        let Some(elapsed) = self.frames.begin(ts) else {
            return FrameOutcome::Idle;
        };
        trace!(ts, elapsed, "rain frame");
        self.field.draw(elapsed, surface, &self.font, rng);

        let rescheduled = !self.motion.is_reduced();
        if rescheduled {
            self.frames.request();
        } else {
            debug!("reduced motion, rain loop stopped after one frame");
        }
        FrameOutcome::Drawn { rescheduled }
    }

    pub fn is_running(&self) -> bool {
        self.frames.is_requested()
    }

    pub fn frames_drawn(&self) -> u64 {
        self.frames.frames()
    }

    pub fn field(&self) -> &RainField {
        &self.field
    }

    pub fn font(&self) -> &Font {
        &self.font
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::GlyphCanvas;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn renderer(motion: MotionPreference) -> RainRenderer {
        RainRenderer::new(&RainConfig::default(), Font::new(14, "monospace"), motion)
    }

    #[test]
    fn test_loop_keeps_running() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut canvas = GlyphCanvas::new();
        let mut rain = renderer(MotionPreference::Full);
        rain.start(GlyphCanvas::viewport_for(80, 24), &mut canvas, &mut rng);

        for ts in (0..1000).step_by(16) {
            assert_eq!(
                rain.on_frame(ts, &mut canvas, &mut rng),
                FrameOutcome::Drawn { rescheduled: true }
            );
        }
        assert!(rain.is_running());
        assert!(canvas.lit_cells() > 0);
    }

    #[test]
    fn test_reduced_motion_draws_exactly_one_frame() {
        let mut rng = StdRng::seed_from_u64(5);
        let mut canvas = GlyphCanvas::new();
        let mut rain = renderer(MotionPreference::Reduced);
        rain.start(GlyphCanvas::viewport_for(80, 24), &mut canvas, &mut rng);

        assert_eq!(
            rain.on_frame(0, &mut canvas, &mut rng),
            FrameOutcome::Drawn { rescheduled: false }
        );
        assert!(!rain.is_running());
        assert_eq!(rain.on_frame(16, &mut canvas, &mut rng), FrameOutcome::Idle);
        assert_eq!(rain.frames_drawn(), 1);
    }

    #[test]
    fn test_resize_resizes_surface_and_columns() {
        let mut rng = StdRng::seed_from_u64(9);
        let mut canvas = GlyphCanvas::new();
        let mut rain = renderer(MotionPreference::Full);
        rain.start(Viewport::new(1600, 800), &mut canvas, &mut rng);
        assert_eq!(rain.field().column_count(), 100);

        rain.resize(Viewport::new(320, 160), &mut canvas, &mut rng);
        assert_eq!(canvas.size(), Viewport::new(320, 160));
        assert_eq!(rain.field().column_count(), 20);
    }
}
