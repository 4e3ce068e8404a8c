//! Page animations for glyphfall.
//!
//! [`PageAnimator`] wires the boot splash, typed text, rain background,
//! scroll reveal and card hover together over a [`glyphfall_core::Dom`].
//! Hosts feed it time, frames and events; it never reads a clock or a
//! window itself (apart from the calendar year).

mod animator;
mod boot;
mod hover;
mod reveal;
mod typing;
mod year;

pub use animator::{AnimatorError, PageAnimator};
pub use boot::{BootFinish, BootSequencer, BootState};
pub use hover::{HoverToggler, PointerTracker};
pub use reveal::{RevealController, intersection_ratio};
pub use typing::{TypingCycler, TypingStep};
pub use year::{current_year, stamp_year};

/// Element holding the footer year.
pub const YEAR_ID: &str = "year";
/// Full-screen boot overlay.
pub const BOOT_SCREEN_ID: &str = "boot-screen";
/// Status line inside the boot overlay.
pub const BOOT_STATUS_CLASS: &str = "boot-status";
/// Target of the typed text.
pub const TYPED_ID: &str = "typed";
/// Elements revealed on scroll.
pub const OBSERVE_CLASS: &str = "observe";
/// Cards that react to hover.
pub const CARD_CLASS: &str = "lang-card";
/// Root style property naming the monospace font.
pub const FONT_PROPERTY: &str = "--font-mono";
