//! Virtual-time timer queue.
//!
//! Every delay in the carousel (flip reveal, draw settle, cooldown,
//! auto-advance) is a payload scheduled on this queue. Time only moves when
//! the owner advances it.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Identifier of a scheduled timer. Also the tie-breaker between timers due
/// at the same instant: earlier-scheduled fires first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Entry<T> {
    due_ms: u64,
    id: TimerId,
    payload: T,
}

impl<T> PartialEq for Entry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.due_ms == other.due_ms && self.id == other.id
    }
}

impl<T> Eq for Entry<T> {}

impl<T> PartialOrd for Entry<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Entry<T> {
    // Reversed so the max-heap yields the earliest (due, id) first.
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .due_ms
            .cmp(&self.due_ms)
            .then_with(|| other.id.cmp(&self.id))
    }
}

/// A queue of payloads that become due at a virtual millisecond timestamp.
#[derive(Debug)]
pub struct TimerQueue<T> {
    now_ms: u64,
    next_id: u64,
    pending: BinaryHeap<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> TimerQueue<T> {
    /// Creates an empty queue at virtual time zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            now_ms: 0,
            next_id: 0,
            pending: BinaryHeap::new(),
        }
    }

    /// Current virtual time in milliseconds.
    #[must_use]
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of timers not yet fired.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if no timer is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Schedules `payload` to fire `after_ms` milliseconds from now.
    pub fn schedule(&mut self, payload: T, after_ms: u64) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.push(Entry {
            due_ms: self.now_ms.saturating_add(after_ms),
            id,
            payload,
        });
        id
    }

    /// Due time of the earliest pending timer.
    #[must_use]
    pub fn next_due_ms(&self) -> Option<u64> {
        self.pending.peek().map(|entry| entry.due_ms)
    }

    /// Pops the earliest timer if it is due at or before `until_ms`, moving
    /// virtual time to its due instant.
    pub fn pop_due(&mut self, until_ms: u64) -> Option<T> {
        if self.next_due_ms()? > until_ms {
            return None;
        }
        let entry = self.pending.pop()?;
        self.now_ms = self.now_ms.max(entry.due_ms);
        Some(entry.payload)
    }

    /// Moves virtual time forward to `until_ms`. Time never goes backwards.
    pub fn advance_to(&mut self, until_ms: u64) {
        self.now_ms = self.now_ms.max(until_ms);
    }

    /// Drops every pending timer, returning how many were discarded.
    pub fn clear(&mut self) -> usize {
        let dropped = self.pending.len();
        self.pending.clear();
        dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_due_returns_timers_in_due_order() {
        // Arrange
        let mut queue = TimerQueue::new();
        queue.schedule("late", 1500);
        queue.schedule("early", 500);
        queue.schedule("middle", 800);

        // Act
        let fired: Vec<_> = std::iter::from_fn(|| queue.pop_due(2000)).collect();

        // Assert
        assert_eq!(fired, vec!["early", "middle", "late"]);
        assert_eq!(queue.now_ms(), 1500);
    }

    #[test]
    fn test_same_due_time_fires_in_schedule_order() {
        let mut queue = TimerQueue::new();
        queue.schedule(1, 500);
        queue.schedule(2, 500);
        queue.schedule(3, 500);

        let fired: Vec<_> = std::iter::from_fn(|| queue.pop_due(500)).collect();

        assert_eq!(fired, vec![1, 2, 3]);
    }

    #[test]
    fn test_pop_due_leaves_future_timers_pending() {
        let mut queue = TimerQueue::new();
        queue.schedule("flip", 800);

        assert_eq!(queue.pop_due(799), None);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_due(800), Some("flip"));
        assert!(queue.is_empty());
    }

    #[test]
    fn test_schedule_is_relative_to_current_time() {
        let mut queue = TimerQueue::new();
        queue.advance_to(1000);

        queue.schedule("settle", 500);

        assert_eq!(queue.next_due_ms(), Some(1500));
    }

    #[test]
    fn test_advance_to_never_moves_backwards() {
        let mut queue: TimerQueue<()> = TimerQueue::new();
        queue.advance_to(300);
        queue.advance_to(100);

        assert_eq!(queue.now_ms(), 300);
    }

    #[test]
    fn test_clear_drops_pending_timers() {
        let mut queue = TimerQueue::new();
        queue.schedule('a', 10);
        queue.schedule('b', 20);

        let dropped = queue.clear();

        assert_eq!(dropped, 2);
        assert_eq!(queue.pop_due(u64::MAX), None);
    }
}
