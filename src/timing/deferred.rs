//! Cooperative queue of actions due at a future time.
//!
//! Nothing here sleeps: the owner polls [`DeferredQueue::take_due`] from its
//! frame callback and runs whatever has come due.

use std::time::Duration;

#[derive(Debug)]
struct Entry<T> {
    due: Duration,
    seq: u64,
    action: T,
}

/// Time-ordered pending actions.
#[derive(Debug)]
pub struct DeferredQueue<T> {
    entries: Vec<Entry<T>>,
    next_seq: u64,
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            next_seq: 0,
        }
    }
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to become due at `due`.
    pub fn schedule(&mut self, due: Duration, action: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Entry { due, seq, action });
    }

    /// Remove and return every action due at or before `now`, earliest first.
    ///
    /// Actions due at the same instant keep their scheduling order.
    pub fn take_due(&mut self, now: Duration) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|e| e.due <= now);
        self.entries = pending;
        due.sort_by_key(|e| (e.due, e.seq));
        due.into_iter().map(|e| e.action).collect()
    }

    /// Drop every pending action.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Drop pending actions matching `predicate`.
    pub fn cancel_where(&mut self, mut predicate: impl FnMut(&T) -> bool) {
        self.entries.retain(|e| !predicate(&e.action));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn nothing_is_due_early() {
        let mut q = DeferredQueue::new();
        q.schedule(ms(100), "a");
        assert!(q.take_due(ms(99)).is_empty());
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn due_actions_come_out_in_time_order() {
        let mut q = DeferredQueue::new();
        q.schedule(ms(300), "late");
        q.schedule(ms(100), "early");
        q.schedule(ms(100), "early-second");
        q.schedule(ms(900), "future");

        assert_eq!(q.take_due(ms(300)), vec!["early", "early-second", "late"]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.take_due(ms(1000)), vec!["future"]);
        assert!(q.is_empty());
    }

    #[test]
    fn cancel_where_removes_matching() {
        let mut q = DeferredQueue::new();
        q.schedule(ms(10), 1);
        q.schedule(ms(10), 2);
        q.schedule(ms(10), 3);
        q.cancel_where(|v| *v % 2 == 1);
        assert_eq!(q.take_due(ms(10)), vec![2]);
    }

    #[test]
    fn clear_drops_everything() {
        let mut q = DeferredQueue::new();
        q.schedule(ms(10), ());
        q.clear();
        assert!(q.take_due(ms(1000)).is_empty());
    }
}
