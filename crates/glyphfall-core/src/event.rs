//! Page events and the subscription registry components listen through.

use std::collections::BTreeMap;

use crate::{ElementId, Viewport};

/// Events a host delivers to the animator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageEvent {
    /// Window resized to a new viewport.
    Resize(Viewport),
    PointerEnter(ElementId),
    PointerLeave(ElementId),
    /// Visibility of an observed element changed.
    Intersection(IntersectionEntry),
}

/// Visible fraction of an element inside the observer root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub ratio: f32,
}

/// Handle returned by [`EventSource::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Something events can be subscribed to, keyed by `K`.
pub trait EventSource<K> {
    fn subscribe(&mut self, key: K) -> SubscriptionId;
    /// Returns `false` if the subscription was already gone.
    fn unsubscribe(&mut self, id: SubscriptionId) -> bool;
    fn is_subscribed(&self, key: &K) -> bool;
}

/// Registry of live subscriptions.
///
/// Subscribing the same key twice returns the existing handle.
#[derive(Debug, Clone)]
pub struct Subscriptions<K> {
    next_id: u64,
    entries: BTreeMap<SubscriptionId, K>,
}

impl<K> Default for Subscriptions<K> {
    fn default() -> Self {
        Self {
            next_id: 0,
            entries: BTreeMap::new(),
        }
    }
}

impl<K: PartialEq> Subscriptions<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_of(&self, key: &K) -> Option<SubscriptionId> {
        self.entries
            .iter()
            .find(|(_, k)| *k == key)
            .map(|(id, _)| *id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: PartialEq> EventSource<K> for Subscriptions<K> {
    fn subscribe(&mut self, key: K) -> SubscriptionId {
        if let Some(id) = self.id_of(&key) {
            return id;
        }
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, key);
        id
    }

    fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.entries.remove(&id).is_some()
    }

    fn is_subscribed(&self, key: &K) -> bool {
        self.id_of(key).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_subscribe_unsubscribe() {
        let mut subs = Subscriptions::new();
        let a = subs.subscribe(ElementId(1));
        let b = subs.subscribe(ElementId(2));
        assert_ne!(a, b);
        assert_eq!(subs.len(), 2);
        assert!(subs.is_subscribed(&ElementId(1)));

        assert!(subs.unsubscribe(a));
        assert!(!subs.unsubscribe(a));
        assert!(!subs.is_subscribed(&ElementId(1)));
        assert_eq!(subs.len(), 1);
        assert!(subs.is_subscribed(&ElementId(2)));
    }

    #[test]
    fn test_duplicate_subscribe_reuses_handle() {
        let mut subs = Subscriptions::new();
        let a = subs.subscribe(ElementId(7));
        let b = subs.subscribe(ElementId(7));
        assert_eq!(a, b);
        assert_eq!(subs.len(), 1);
    }
}
