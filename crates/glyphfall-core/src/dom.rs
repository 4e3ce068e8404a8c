//! Document model: the subset of a page the animator reads and writes.

use std::collections::{BTreeSet, HashMap};

use crate::Millis;

/// Handle to an element in a [`Dom`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

/// Page operations the animator depends on.
///
/// Lookups never see removed elements. Writes to a removed or unknown
/// element are ignored.
pub trait Dom {
    /// Find an element by its `id` attribute.
    fn element_by_id(&self, id: &str) -> Option<ElementId>;
    /// All live elements carrying `class`, in document order.
    fn elements_with_class(&self, class: &str) -> Vec<ElementId>;
    fn set_text(&mut self, el: ElementId, text: &str);
    fn add_class(&mut self, el: ElementId, class: &str);
    fn remove_class(&mut self, el: ElementId, class: &str);
    fn has_class(&self, el: ElementId, class: &str) -> bool;
    /// Set opacity, animated over `transition_ms` by the host.
    fn set_opacity(&mut self, el: ElementId, opacity: f32, transition_ms: Millis);
    /// Detach the element from the layout.
    fn remove(&mut self, el: ElementId);
    /// Read a custom style property set on the root element.
    fn style_property(&self, name: &str) -> Option<String>;
}

/// A single element of a [`PageDocument`].
#[derive(Debug, Clone)]
pub struct Element {
    pub id: Option<String>,
    pub classes: BTreeSet<String>,
    pub text: String,
    pub opacity: f32,
    pub transition_ms: Millis,
    pub removed: bool,
}

impl Element {
    fn new(id: Option<&str>, classes: &[&str]) -> Self {
        Self {
            id: id.map(str::to_string),
            classes: classes.iter().map(|c| c.to_string()).collect(),
            text: String::new(),
            opacity: 1.0,
            transition_ms: 0,
            removed: false,
        }
    }
}

/// In-memory [`Dom`] used by the terminal host and by tests.
#[derive(Debug, Clone, Default)]
pub struct PageDocument {
    elements: Vec<Element>,
    styles: HashMap<String, String>,
}

impl PageDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element and return its handle.
    pub fn insert(&mut self, id: Option<&str>, classes: &[&str]) -> ElementId {
        let handle = ElementId(self.elements.len() as u32);
        self.elements.push(Element::new(id, classes));
        handle
    }

    /// Append an element with initial text content.
    pub fn insert_text(&mut self, id: Option<&str>, classes: &[&str], text: &str) -> ElementId {
        let handle = self.insert(id, classes);
        self.elements[handle.0 as usize].text = text.to_string();
        handle
    }

    pub fn set_style_property(&mut self, name: &str, value: &str) {
        self.styles.insert(name.to_string(), value.to_string());
    }

    /// Element state, including removed elements.
    pub fn element(&self, el: ElementId) -> Option<&Element> {
        self.elements.get(el.0 as usize)
    }

    /// Text content of a live element.
    pub fn text(&self, el: ElementId) -> Option<&str> {
        self.live(el).map(|e| e.text.as_str())
    }

    pub fn is_removed(&self, el: ElementId) -> bool {
        self.element(el).is_none_or(|e| e.removed)
    }

    fn live(&self, el: ElementId) -> Option<&Element> {
        self.elements.get(el.0 as usize).filter(|e| !e.removed)
    }

    fn live_mut(&mut self, el: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(el.0 as usize).filter(|e| !e.removed)
    }
}

impl Dom for PageDocument {
    fn element_by_id(&self, id: &str) -> Option<ElementId> {
        self.elements
            .iter()
            .position(|e| !e.removed && e.id.as_deref() == Some(id))
            .map(|i| ElementId(i as u32))
    }

    fn elements_with_class(&self, class: &str) -> Vec<ElementId> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.removed && e.classes.contains(class))
            .map(|(i, _)| ElementId(i as u32))
            .collect()
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        if let Some(e) = self.live_mut(el) {
            e.text.clear();
            e.text.push_str(text);
        }
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        if let Some(e) = self.live_mut(el) {
            e.classes.insert(class.to_string());
        }
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        if let Some(e) = self.live_mut(el) {
            e.classes.remove(class);
        }
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.live(el).is_some_and(|e| e.classes.contains(class))
    }

    fn set_opacity(&mut self, el: ElementId, opacity: f32, transition_ms: Millis) {
        if let Some(e) = self.live_mut(el) {
            e.opacity = opacity.clamp(0.0, 1.0);
            e.transition_ms = transition_ms;
        }
    }

    fn remove(&mut self, el: ElementId) {
        if let Some(e) = self.elements.get_mut(el.0 as usize) {
            e.removed = true;
        }
    }

    fn style_property(&self, name: &str) -> Option<String> {
        self.styles.get(name).cloned()
    }
}
