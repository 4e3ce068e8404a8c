//! Terminal drawing surface.

use glyphfall_core::{Rgb, Viewport};
use ratatui::{
    Frame,
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::surface::{Font, Surface};

/// Pixel width of one terminal cell.
pub const CELL_WIDTH_PX: u32 = 8;
/// Pixel height of one terminal cell.
pub const CELL_HEIGHT_PX: u32 = 16;

/// Cells dimmer than this are cleared.
const MIN_INTENSITY: f32 = 0.04;

/// One terminal cell of the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub glyph: char,
    pub color: Rgb,
    /// 1.0 when just drawn, decays with every overlay.
    pub intensity: f32,
}

impl Cell {
    const EMPTY: Cell = Cell {
        glyph: ' ',
        color: Rgb::new(0, 0, 0),
        intensity: 0.0,
    };

    pub fn is_empty(&self) -> bool {
        self.glyph == ' '
    }
}

/// A [`Surface`] backed by a grid of terminal cells.
///
/// Pixel coordinates map onto cells of [`CELL_WIDTH_PX`] x
/// [`CELL_HEIGHT_PX`]. Overlays fade cells toward the overlay color, which
/// leaves trails behind moving glyphs the same way a translucent fill does on
/// a bitmap.
#[derive(Debug, Clone)]
pub struct GlyphCanvas {
    size: Viewport,
    cols: usize,
    rows: usize,
    cells: Vec<Cell>,
    background: Rgb,
}

impl Default for GlyphCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl GlyphCanvas {
    pub fn new() -> Self {
        Self {
            size: Viewport::default(),
            cols: 0,
            rows: 0,
            cells: Vec::new(),
            background: Rgb::new(0, 0, 0),
        }
    }

    /// Pixel viewport covering a terminal of `cols` x `rows` cells.
    pub fn viewport_for(cols: u16, rows: u16) -> Viewport {
        Viewport::new(cols as u32 * CELL_WIDTH_PX, rows as u32 * CELL_HEIGHT_PX)
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&Cell> {
        if col >= self.cols || row >= self.rows {
            return None;
        }
        self.cells.get(row * self.cols + col)
    }

    /// Number of cells currently showing a glyph.
    pub fn lit_cells(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// Color a cell shows after blending over the background.
    fn shade(&self, cell: &Cell) -> Color {
        let c = self.background.mix(cell.color, cell.intensity);
        Color::Rgb(c.r, c.g, c.b)
    }

    /// Styled lines, one per cell row.
    pub fn lines(&self) -> Vec<Line<'static>> {
        (0..self.rows)
            .map(|row| {
                let spans: Vec<Span> = self.cells[row * self.cols..(row + 1) * self.cols]
                    .iter()
                    .map(|cell| {
                        if cell.is_empty() {
                            Span::raw(" ")
                        } else {
                            Span::styled(cell.glyph.to_string(), Style::new().fg(self.shade(cell)))
                        }
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }

    /// Render the canvas across the whole frame.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(Paragraph::new(self.lines()), area);
    }
}

impl Surface for GlyphCanvas {
    fn size(&self) -> Viewport {
        self.size
    }

    fn resize(&mut self, viewport: Viewport) {
        self.size = viewport;
        self.cols = (viewport.width / CELL_WIDTH_PX) as usize;
        self.rows = (viewport.height / CELL_HEIGHT_PX) as usize;
        self.cells = vec![Cell::EMPTY; self.cols * self.rows];
    }

    fn fill_overlay(&mut self, color: Rgb, alpha: f32) {
        self.background = color;
        let keep = 1.0 - alpha.clamp(0.0, 1.0);
        for cell in &mut self.cells {
            if cell.is_empty() {
                continue;
            }
            cell.intensity *= keep;
            if cell.intensity < MIN_INTENSITY {
                *cell = Cell::EMPTY;
            }
        }
    }

    fn fill_text(&mut self, glyph: char, x: f32, y: f32, _font: &Font, color: Rgb) {
        if x < 0.0 || y < 0.0 {
            return;
        }
        let col = (x / CELL_WIDTH_PX as f32) as usize;
        let row = (y / CELL_HEIGHT_PX as f32) as usize;
        if col >= self.cols || row >= self.rows {
            return;
        }
        self.cells[row * self.cols + col] = Cell {
            glyph,
            color,
            intensity: 1.0,
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas(cols: u16, rows: u16) -> GlyphCanvas {
        let mut canvas = GlyphCanvas::new();
        canvas.resize(GlyphCanvas::viewport_for(cols, rows));
        canvas
    }

    #[test]
    fn test_resize_maps_pixels_to_cells() {
        let canvas = canvas(80, 24);
        assert_eq!(canvas.size(), Viewport::new(640, 384));
        assert_eq!(canvas.cols(), 80);
        assert_eq!(canvas.rows(), 24);
        assert_eq!(canvas.lit_cells(), 0);
    }

    #[test]
    fn test_fill_text_lands_in_cell() {
        let mut canvas = canvas(10, 5);
        let font = Font::new(14, "monospace");
        canvas.fill_text('1', 17.0, 40.0, &font, Rgb::new(0x21, 0xff, 0x6a));

        let cell = canvas.cell(2, 2).unwrap();
        assert_eq!(cell.glyph, '1');
        assert_eq!(cell.intensity, 1.0);
        assert_eq!(canvas.lit_cells(), 1);
    }

    #[test]
    fn test_out_of_bounds_text_is_clipped() {
        let mut canvas = canvas(10, 5);
        let font = Font::new(14, "monospace");
        canvas.fill_text('0', 0.0, -12.0, &font, Rgb::new(255, 255, 255));
        canvas.fill_text('0', 80.0, 0.0, &font, Rgb::new(255, 255, 255));
        canvas.fill_text('0', 0.0, 80.0, &font, Rgb::new(255, 255, 255));
        assert_eq!(canvas.lit_cells(), 0);
    }

    #[test]
    fn test_overlay_fades_trails_out() {
        let mut canvas = canvas(4, 4);
        let font = Font::new(14, "monospace");
        canvas.fill_text('0', 0.0, 0.0, &font, Rgb::new(0x21, 0xff, 0x6a));

        canvas.fill_overlay(Rgb::new(6, 17, 11), 0.08);
        let faded = canvas.cell(0, 0).unwrap().intensity;
        assert!(faded < 1.0 && faded > 0.9);

        for _ in 0..60 {
            canvas.fill_overlay(Rgb::new(6, 17, 11), 0.08);
        }
        assert_eq!(canvas.lit_cells(), 0);
    }

    #[test]
    fn test_lines_cover_grid() {
        let mut canvas = canvas(6, 3);
        canvas.fill_text('1', 8.0, 16.0, &Font::new(14, "monospace"), Rgb::new(0, 255, 0));
        let lines = canvas.lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].width(), 6);
        assert_eq!(lines[1].spans[1].content, "1");
    }
}
