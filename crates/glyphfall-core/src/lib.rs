//! Core types for the glyphfall page animator.
//!
//! Everything the animation components need from their environment lives
//! here behind small types and traits: a virtual clock ([`Millis`]), a
//! document model ([`Dom`]), a timer queue, a steppable frame loop and a
//! subscription registry. Hosts (a terminal, a browser) implement or drive
//! these; the components never talk to a real window.

mod color;
mod dom;
mod event;
mod frame;
mod geometry;
mod timer;

pub use color::{ParseColorError, Rgb};
pub use dom::{Dom, Element, ElementId, PageDocument};
pub use event::{EventSource, IntersectionEntry, PageEvent, SubscriptionId, Subscriptions};
pub use frame::FrameLoop;
pub use geometry::{Rect, Viewport};
pub use timer::TimerQueue;

/// Virtual time in milliseconds since page load.
pub type Millis = u64;

/// User/OS preference for animation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MotionPreference {
    #[default]
    Full,
    Reduced,
}

impl MotionPreference {
    /// Build from a `prefers-reduced-motion: reduce` style flag.
    pub fn from_reduced(reduced: bool) -> Self {
        if reduced {
            MotionPreference::Reduced
        } else {
            MotionPreference::Full
        }
    }

    /// Whether animations should be minimized.
    pub fn is_reduced(self) -> bool {
        self == MotionPreference::Reduced
    }
}
