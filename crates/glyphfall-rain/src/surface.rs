//! Drawing surface abstraction.

use std::fmt;

use glyphfall_core::{Rgb, Viewport};

/// Font used for glyphs, e.g. `14px monospace`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    pub size_px: u16,
    pub family: String,
}

impl Font {
    pub fn new(size_px: u16, family: impl Into<String>) -> Self {
        Self {
            size_px,
            family: family.into(),
        }
    }
}

impl fmt::Display for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px {}", self.size_px, self.family)
    }
}

/// A 2D drawing target sized in pixels.
pub trait Surface {
    fn size(&self) -> Viewport;
    /// Match the surface to a new viewport. Existing content may be lost.
    fn resize(&mut self, viewport: Viewport);
    /// Paint `color` at `alpha` over the entire surface.
    fn fill_overlay(&mut self, color: Rgb, alpha: f32);
    /// Draw one glyph with its baseline-left corner at (`x`, `y`).
    fn fill_text(&mut self, glyph: char, x: f32, y: f32, font: &Font, color: Rgb);
}
