//! Falling binary digit background.
//!
//! The rain is drawn through the [`Surface`] trait so any host can provide
//! the pixels. [`GlyphCanvas`] is the terminal surface: a grid of cells with
//! fading intensity that renders as a ratatui widget.

mod canvas;
mod field;
mod renderer;
mod surface;

pub use canvas::{CELL_HEIGHT_PX, CELL_WIDTH_PX, Cell, GlyphCanvas};
pub use field::RainField;
pub use renderer::{FrameOutcome, RainRenderer};
pub use surface::{Font, Surface};
