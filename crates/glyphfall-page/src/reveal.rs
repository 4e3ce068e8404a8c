//! One-shot reveal of elements as they scroll into view.

use glyphfall_config::RevealConfig;
use glyphfall_core::{
    Dom, ElementId, EventSource, IntersectionEntry, Rect, Subscriptions, Viewport,
};
use tracing::debug;

use crate::OBSERVE_CLASS;

/// Fraction of `target`'s area that lies inside `root`.
///
/// A zero-area target counts as fully visible when it sits inside the root.
pub fn intersection_ratio(target: &Rect, root: &Rect) -> f32 {
    let area = target.area();
    match target.intersection(root) {
        None => 0.0,
        Some(_) if area == 0.0 => 1.0,
        Some(overlap) => (overlap.area() / area).clamp(0.0, 1.0),
    }
}

/// Adds the reveal class to observed elements once enough of them is
/// visible, then stops observing them.
#[derive(Debug, Clone)]
pub struct RevealController {
    threshold: f32,
    bottom_margin: f32,
    class: String,
    observed: Subscriptions<ElementId>,
}

impl RevealController {
    pub fn new(config: &RevealConfig) -> Self {
        Self {
            threshold: config.threshold,
            bottom_margin: config.bottom_margin,
            class: config.class.clone(),
            observed: Subscriptions::new(),
        }
    }

    pub fn observe(&mut self, el: ElementId) {
        self.observed.subscribe(el);
    }

    /// Observe every element marked for reveal.
    pub fn observe_all<D: Dom + ?Sized>(&mut self, dom: &D) -> usize {
        for el in dom.elements_with_class(OBSERVE_CLASS) {
            self.observe(el);
        }
        self.observed.len()
    }

    pub fn is_observing(&self, el: ElementId) -> bool {
        self.observed.is_subscribed(&el)
    }

    /// Observer root: the viewport with the bottom margin cut off.
    pub fn root(&self, viewport: Viewport) -> Rect {
        let vp = viewport.rect();
        Rect::new(vp.x, vp.y, vp.width, vp.height * (1.0 - self.bottom_margin))
    }

    /// Handle one intersection report. Returns `true` if it revealed the
    /// element.
    pub fn on_intersection<D: Dom + ?Sized>(
        &mut self,
        entry: IntersectionEntry,
        dom: &mut D,
    ) -> bool {
        let Some(id) = self.observed.id_of(&entry.target) else {
            return false;
        };
        if entry.ratio < self.threshold {
            return false;
        }
        dom.add_class(entry.target, &self.class);
        self.observed.unsubscribe(id);
        debug!(element = entry.target.0, ratio = entry.ratio, "revealed");
        true
    }

    /// Build intersection reports for observed elements from their current
    /// layout rectangles, for hosts without a native observer.
    pub fn entries<I>(&self, viewport: Viewport, layout: I) -> Vec<IntersectionEntry>
    where
        I: IntoIterator<Item = (ElementId, Rect)>,
    {
        let root = self.root(viewport);
        layout
            .into_iter()
            .filter(|(el, _)| self.is_observing(*el))
            .map(|(target, rect)| IntersectionEntry {
                target,
                ratio: intersection_ratio(&rect, &root),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glyphfall_core::PageDocument;

    fn setup() -> (PageDocument, RevealController, ElementId) {
        let mut doc = PageDocument::new();
        let el = doc.insert(None, &[OBSERVE_CLASS]);
        doc.insert(None, &["plain"]);
        let mut reveal = RevealController::new(&RevealConfig::default());
        assert_eq!(reveal.observe_all(&doc), 1);
        (doc, reveal, el)
    }

    #[test]
    fn test_ratio() {
        let root = Rect::new(0.0, 0.0, 100.0, 90.0);
        assert_eq!(intersection_ratio(&Rect::new(0.0, 0.0, 10.0, 10.0), &root), 1.0);
        assert_eq!(intersection_ratio(&Rect::new(0.0, 80.0, 10.0, 100.0), &root), 0.1);
        assert_eq!(intersection_ratio(&Rect::new(0.0, 200.0, 10.0, 10.0), &root), 0.0);
        assert_eq!(intersection_ratio(&Rect::new(5.0, 5.0, 0.0, 0.0), &root), 1.0);
    }

    #[test]
    fn test_root_excludes_bottom_margin() {
        let reveal = RevealController::new(&RevealConfig::default());
        assert_eq!(
            reveal.root(Viewport::new(1000, 800)),
            Rect::new(0.0, 0.0, 1000.0, 720.0)
        );
    }

    #[test]
    fn test_below_threshold_does_not_reveal() {
        let (mut doc, mut reveal, el) = setup();
        let entry = IntersectionEntry {
            target: el,
            ratio: 0.09,
        };
        assert!(!reveal.on_intersection(entry, &mut doc));
        assert!(!doc.has_class(el, "in-view"));
        assert!(reveal.is_observing(el));
    }

    #[test]
    fn test_reveal_is_one_shot() {
        let (mut doc, mut reveal, el) = setup();
        let entry = IntersectionEntry {
            target: el,
            ratio: 0.1,
        };
        assert!(reveal.on_intersection(entry, &mut doc));
        assert!(doc.has_class(el, "in-view"));
        assert!(!reveal.is_observing(el));

        // Scrolling away and back does not reveal again.
        doc.remove_class(el, "in-view");
        assert!(!reveal.on_intersection(entry, &mut doc));
        assert!(!doc.has_class(el, "in-view"));
    }

    #[test]
    fn test_unobserved_elements_ignored() {
        let (mut doc, mut reveal, _) = setup();
        let plain = doc.elements_with_class("plain")[0];
        let entry = IntersectionEntry {
            target: plain,
            ratio: 1.0,
        };
        assert!(!reveal.on_intersection(entry, &mut doc));
        assert!(!doc.has_class(plain, "in-view"));
    }

    #[test]
    fn test_entries_respect_margin() {
        let (_, reveal, el) = setup();
        let viewport = Viewport::new(800, 1000);

        // Top 50px of a 100px element is on screen but inside the bottom
        // margin, so nothing counts.
        let entries = reveal.entries(viewport, [(el, Rect::new(0.0, 950.0, 800.0, 100.0))]);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].ratio, 0.0);

        let entries = reveal.entries(viewport, [(el, Rect::new(0.0, 880.0, 800.0, 100.0))]);
        assert!((entries[0].ratio - 0.2).abs() < 1e-6);
    }
}
