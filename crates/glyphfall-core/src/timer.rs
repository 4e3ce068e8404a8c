//! One-shot timers ordered by due time.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::Millis;

#[derive(Debug)]
struct Entry<T> {
    due: Millis,
    seq: u64,
    task: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due == other.due && self.seq == other.seq
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the max-heap pops the earliest entry.
    fn cmp(&self, other: &Self) -> Ordering {
        (other.due, other.seq).cmp(&(self.due, self.seq))
    }
}

/// Pending `setTimeout`-style tasks.
///
/// Tasks with equal due times fire in the order they were scheduled.
#[derive(Debug)]
pub struct TimerQueue<T> {
    heap: BinaryHeap<Entry<T>>,
    seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `task` to fire at absolute time `due`.
    pub fn schedule(&mut self, due: Millis, task: T) {
        self.heap.push(Entry {
            due,
            seq: self.seq,
            task,
        });
        self.seq += 1;
    }

    /// Schedule `task` to fire `delay` after `now`.
    pub fn schedule_after(&mut self, now: Millis, delay: Millis, task: T) {
        self.schedule(now.saturating_add(delay), task);
    }

    /// Pop the earliest task due at or before `now`, with its due time.
    pub fn pop_due(&mut self, now: Millis) -> Option<(Millis, T)> {
        if self.heap.peek()?.due > now {
            return None;
        }
        self.heap.pop().map(|e| (e.due, e.task))
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.heap.peek().map(|e| e.due)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_in_due_order() {
        let mut timers = TimerQueue::new();
        timers.schedule(300, "c");
        timers.schedule(100, "a");
        timers.schedule(200, "b");

        assert_eq!(timers.next_due(), Some(100));
        assert_eq!(timers.pop_due(50), None);
        assert_eq!(timers.pop_due(250), Some((100, "a")));
        assert_eq!(timers.pop_due(250), Some((200, "b")));
        assert_eq!(timers.pop_due(250), None);
        assert_eq!(timers.len(), 1);
    }

    #[test]
    fn test_ties_fire_in_schedule_order() {
        let mut timers = TimerQueue::new();
        timers.schedule_after(1000, 380, 1);
        timers.schedule_after(1000, 380, 2);
        assert_eq!(timers.pop_due(1380), Some((1380, 1)));
        assert_eq!(timers.pop_due(1380), Some((1380, 2)));
        assert!(timers.is_empty());
    }
}
