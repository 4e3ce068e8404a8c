//! Hover class toggling on cards.

use glyphfall_config::HoverConfig;
use glyphfall_core::{Dom, ElementId, EventSource, PageEvent, Rect, Subscriptions};

use crate::CARD_CLASS;

/// Adds the hover class on pointer-enter and removes it on pointer-leave.
#[derive(Debug, Clone)]
pub struct HoverToggler {
    class: String,
    cards: Subscriptions<ElementId>,
}

impl HoverToggler {
    pub fn new(config: &HoverConfig) -> Self {
        Self {
            class: config.class.clone(),
            cards: Subscriptions::new(),
        }
    }

    /// Listen for pointer events on every card.
    pub fn attach<D: Dom + ?Sized>(&mut self, dom: &D) -> usize {
        for card in dom.elements_with_class(CARD_CLASS) {
            self.cards.subscribe(card);
        }
        self.cards.len()
    }

    pub fn is_attached(&self, el: ElementId) -> bool {
        self.cards.is_subscribed(&el)
    }

    /// Apply a pointer event. Returns `true` if it targeted a card.
    pub fn on_pointer<D: Dom + ?Sized>(&self, event: PageEvent, dom: &mut D) -> bool {
        match event {
            PageEvent::PointerEnter(el) if self.is_attached(el) => {
                dom.add_class(el, &self.class);
                true
            }
            PageEvent::PointerLeave(el) if self.is_attached(el) => {
                dom.remove_class(el, &self.class);
                true
            }
            _ => false,
        }
    }
}

/// Turns raw pointer positions into enter/leave events, for hosts that only
/// report coordinates.
#[derive(Debug, Clone, Default)]
pub struct PointerTracker {
    hovered: Option<ElementId>,
}

impl PointerTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hovered(&self) -> Option<ElementId> {
        self.hovered
    }

    /// Hit-test (`x`, `y`) against `targets` and emit the transitions.
    /// The first matching rectangle wins.
    pub fn move_to<I>(&mut self, x: f32, y: f32, targets: I) -> Vec<PageEvent>
    where
        I: IntoIterator<Item = (ElementId, Rect)>,
    {
        let hit = targets
            .into_iter()
            .find(|(_, rect)| rect.contains(x, y))
            .map(|(el, _)| el);
        self.transition(hit)
    }

    /// Pointer left the page entirely.
    pub fn leave(&mut self) -> Vec<PageEvent> {
        self.transition(None)
    }

    fn transition(&mut self, hit: Option<ElementId>) -> Vec<PageEvent> {
        if hit == self.hovered {
            return Vec::new();
        }
        let mut events = Vec::with_capacity(2);
        if let Some(prev) = self.hovered {
            events.push(PageEvent::PointerLeave(prev));
        }
        if let Some(next) = hit {
            events.push(PageEvent::PointerEnter(next));
        }
        self.hovered = hit;
        events
    }
}
