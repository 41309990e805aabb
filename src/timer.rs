//! Cancellable one-shot timers.
//!
//! Each experiment instance owns a [`Timers`] queue for its delayed effects
//! (explosion expiry, glitch commit, complexity decay). The queue lives and
//! dies with the instance, so discarding an experiment discards every pending
//! callback with it; nothing can fire into a stale instance.
//!
//! # Example
//!
//! ```ignore
//! let mut timers = Timers::new();
//! let handle = timers.schedule(now, Duration::from_millis(2000), Decay);
//!
//! // A newer request supersedes the old one
//! timers.cancel(handle);
//! let handle = timers.schedule(now, Duration::from_millis(2000), Decay);
//!
//! while let Some((at, event)) = timers.pop_due(now) {
//!     // handle event
//! }
//! ```

use std::time::Duration;

/// Opaque handle to a scheduled timer, used to cancel it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

#[derive(Debug)]
struct Pending<E> {
    id: u64,
    due: Duration,
    event: E,
}

/// Queue of one-shot timers carrying events of type `E`.
#[derive(Debug)]
pub struct Timers<E> {
    next_id: u64,
    pending: Vec<Pending<E>>,
}

impl<E> Timers<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Schedule `event` to fire `delay` after `now`.
    pub fn schedule(&mut self, now: Duration, delay: Duration, event: E) -> TimerHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push(Pending {
            id,
            due: now + delay,
            event,
        });
        TimerHandle(id)
    }

    /// Cancel a pending timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != handle.0);
        self.pending.len() != before
    }

    /// Whether the timer behind `handle` is still waiting to fire.
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|p| p.id == handle.0)
    }

    /// Earliest deadline among pending timers.
    pub fn next_due(&self) -> Option<Duration> {
        self.pending.iter().map(|p| p.due).min()
    }

    /// Remove and return the earliest timer due at or before `now`.
    ///
    /// Timers with equal deadlines fire in the order they were scheduled.
    pub fn pop_due(&mut self, now: Duration) -> Option<(Duration, E)> {
        let index = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, p)| p.due <= now)
            .min_by_key(|(_, p)| (p.due, p.id))
            .map(|(i, _)| i)?;
        let fired = self.pending.swap_remove(index);
        Some((fired.due, fired.event))
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

impl<E> Default for Timers<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn test_fires_in_deadline_order() {
        let mut timers = Timers::new();
        timers.schedule(ms(0), ms(300), "late");
        timers.schedule(ms(0), ms(100), "early");
        timers.schedule(ms(50), ms(50), "tie");

        assert_eq!(timers.next_due(), Some(ms(100)));
        assert_eq!(timers.pop_due(ms(99)), None);
        assert_eq!(timers.pop_due(ms(500)), Some((ms(100), "early")));
        assert_eq!(timers.pop_due(ms(500)), Some((ms(100), "tie")));
        assert_eq!(timers.pop_due(ms(500)), Some((ms(300), "late")));
        assert!(timers.is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut timers = Timers::new();
        let a = timers.schedule(ms(0), ms(10), 1);
        let b = timers.schedule(ms(0), ms(20), 2);

        assert!(timers.cancel(a));
        assert!(!timers.cancel(a));
        assert!(!timers.is_pending(a));
        assert!(timers.is_pending(b));
        assert_eq!(timers.pop_due(ms(100)), Some((ms(20), 2)));
        assert!(!timers.cancel(b));
    }

    #[test]
    fn test_handles_are_unique_after_clear() {
        let mut timers = Timers::new();
        let a = timers.schedule(ms(0), ms(10), ());
        timers.clear();
        let b = timers.schedule(ms(0), ms(10), ());
        assert_ne!(a, b);
        assert!(!timers.cancel(a));
        assert_eq!(timers.len(), 1);
    }
}
