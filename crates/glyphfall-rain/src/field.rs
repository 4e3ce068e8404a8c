//! Rain column state (stateful animation).

use glyphfall_config::RainConfig;
use glyphfall_core::{Millis, Rgb, Viewport};
use rand::Rng;
use tracing::debug;

use crate::surface::{Font, Surface};

/// Falling glyph columns spanning the viewport.
#[derive(Debug, Clone)]
pub struct RainField {
    /// Current y position of each column's glyph, in pixels.
    offsets: Vec<f32>,
    viewport: Viewport,
    column_width: u32,
    base_speed: f32,
    speed_step: f32,
    speed_period: u32,
    reset_span: f32,
    glyphs: Vec<char>,
    glyph_color: Rgb,
    trail_color: Rgb,
    trail_alpha: f32,
}

impl RainField {
    /// Create an empty field. Call [`RainField::resize`] before drawing.
    pub fn new(config: &RainConfig) -> Self {
        Self {
            offsets: Vec::new(),
            viewport: Viewport::default(),
            column_width: config.column_width.max(1),
            base_speed: config.base_speed,
            speed_step: config.speed_step,
            speed_period: config.speed_period.max(1),
            reset_span: config.reset_span,
            glyphs: if config.glyphs.is_empty() {
                vec!['0', '1']
            } else {
                config.glyphs.clone()
            },
            glyph_color: config.glyph_color,
            trail_color: config.trail_color,
            trail_alpha: config.trail_alpha,
        }
    }

    /// Rebuild the columns for a new viewport.
    ///
    /// The column count is `floor(width / column_width)` and every column
    /// starts at a random height inside the viewport.
    pub fn resize<R: Rng + ?Sized>(&mut self, viewport: Viewport, rng: &mut R) {
        let columns = (viewport.width / self.column_width) as usize;
        let height = viewport.height as f32;
        self.offsets = (0..columns).map(|_| rng.random::<f32>() * height).collect();
        self.viewport = viewport;
        debug!(
            width = viewport.width,
            height = viewport.height,
            columns,
            "rain columns rebuilt"
        );
    }

    pub fn column_count(&self) -> usize {
        self.offsets.len()
    }

    pub fn offsets(&self) -> &[f32] {
        &self.offsets
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Fall speed of column `index` in px/s.
    pub fn column_speed(&self, index: usize) -> f32 {
        let step = (index % self.speed_period as usize) as f32;
        self.base_speed + step * self.speed_step
    }

    /// Draw one frame and advance every column by `elapsed_ms`.
    ///
    /// Columns that fall past the bottom re-enter from a random point within
    /// `reset_span` pixels above the top.
    pub fn draw<S, R>(&mut self, elapsed_ms: Millis, surface: &mut S, font: &Font, rng: &mut R)
    where
        S: Surface + ?Sized,
        R: Rng + ?Sized,
    {
        surface.fill_overlay(self.trail_color, self.trail_alpha);

        let height = self.viewport.height as f32;
        let elapsed = elapsed_ms as f32;
        for i in 0..self.offsets.len() {
            let x = (i as u32 * self.column_width) as f32;
            let y = self.offsets[i];
            let glyph = self.glyphs[rng.random_range(0..self.glyphs.len())];
            surface.fill_text(glyph, x, y, font, self.glyph_color);

            let mut next = y + elapsed * self.column_speed(i) / 1000.0;
            if next > height {
                next = -(1.0 - rng.random::<f32>()) * self.reset_span;
            }
            self.offsets[i] = next;
        }
    }

    #[cfg(test)]
    pub(crate) fn set_offset(&mut self, index: usize, y: f32) {
        self.offsets[index] = y;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    /// Records draw calls instead of rasterizing them.
    #[derive(Default)]
    struct Recorder {
        size: Viewport,
        overlays: usize,
        glyphs: Vec<(char, f32, f32)>,
    }

    impl Surface for Recorder {
        fn size(&self) -> Viewport {
            self.size
        }

        fn resize(&mut self, viewport: Viewport) {
            self.size = viewport;
        }

        fn fill_overlay(&mut self, _color: Rgb, _alpha: f32) {
            self.overlays += 1;
        }

        fn fill_text(&mut self, glyph: char, x: f32, y: f32, _font: &Font, _color: Rgb) {
            self.glyphs.push((glyph, x, y));
        }
    }

    fn field() -> RainField {
        RainField::new(&RainConfig::default())
    }

    #[test]
    fn test_column_count_follows_width() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut rain = field();

        rain.resize(Viewport::new(1600, 900), &mut rng);
        assert_eq!(rain.column_count(), 100);

        for width in [0, 15, 16, 17, 799, 1920, 2561] {
            rain.resize(Viewport::new(width, 600), &mut rng);
            assert_eq!(rain.column_count(), (width / 16) as usize);
            assert_eq!(rain.offsets().len(), rain.column_count());
        }
    }

    #[test]
    fn test_initial_offsets_within_viewport() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut rain = field();
        rain.resize(Viewport::new(1280, 720), &mut rng);
        assert!(rain.offsets().iter().all(|&y| (0.0..720.0).contains(&y)));
    }

    #[test]
    fn test_column_speeds() {
        let rain = field();
        assert_eq!(rain.column_speed(0), 40.0);
        assert_eq!(rain.column_speed(1), 46.0);
        assert_eq!(rain.column_speed(6), 76.0);
        assert_eq!(rain.column_speed(7), 40.0);
    }

    #[test]
    fn test_frame_advances_by_speed() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut rain = field();
        rain.resize(Viewport::new(64, 10_000), &mut rng);
        for i in 0..4 {
            rain.set_offset(i, 100.0);
        }

        let mut surface = Recorder::default();
        rain.draw(500, &mut surface, &Font::new(14, "monospace"), &mut rng);

        assert_eq!(surface.overlays, 1);
        assert_eq!(surface.glyphs.len(), 4);
        for (i, &(glyph, x, y)) in surface.glyphs.iter().enumerate() {
            assert!(glyph == '0' || glyph == '1');
            assert_eq!(x, (i * 16) as f32);
            assert_eq!(y, 100.0);
        }
        assert_eq!(rain.offsets(), &[120.0, 123.0, 126.0, 129.0]);
    }

    #[test]
    fn test_offscreen_columns_reenter_from_above() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut rain = field();
        rain.resize(Viewport::new(1600, 400), &mut rng);
        let font = Font::new(14, "monospace");
        let mut surface = Recorder::default();

        for _ in 0..50 {
            for i in 0..rain.column_count() {
                rain.set_offset(i, 399.9);
            }
            rain.draw(100, &mut surface, &font, &mut rng);
            assert!(
                rain.offsets()
                    .iter()
                    .all(|&y| (-80.0..0.0).contains(&y))
            );
        }
    }

    #[test]
    fn test_glyph_choice_uses_both_digits() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut rain = field();
        rain.resize(Viewport::new(1600, 900), &mut rng);
        let mut surface = Recorder::default();
        rain.draw(16, &mut surface, &Font::new(14, "monospace"), &mut rng);

        let ones = surface.glyphs.iter().filter(|g| g.0 == '1').count();
        let zeros = surface.glyphs.iter().filter(|g| g.0 == '0').count();
        assert_eq!(ones + zeros, 100);
        assert!(ones > 20 && zeros > 20);
    }
}
