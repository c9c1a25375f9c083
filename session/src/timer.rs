//! Virtual-clock timer queue used by frame-driven hosts.

use std::time::Duration;

use snake_arcade_core::{Timer, TimerHandle};

/// Single-shot timers measured against an internal clock advanced by the host.
#[derive(Debug, Default)]
pub struct TimerQueue {
    now: Duration,
    next_id: u64,
    pending: Vec<(Duration, TimerHandle)>,
}

impl TimerQueue {
    /// Creates an empty queue at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the queue's clock.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of wake-ups not yet fired or cancelled.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Reports whether nothing is scheduled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Delay until the earliest pending wake-up.
    #[must_use]
    pub fn until_next(&self) -> Option<Duration> {
        self.pending
            .iter()
            .map(|(due, _)| due.saturating_sub(self.now))
            .min()
    }

    /// Moves the clock forward and returns every expired handle, earliest first.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerHandle> {
        self.now = self.now.saturating_add(dt);
        let now = self.now;

        let mut expired: Vec<(Duration, TimerHandle)> = Vec::new();
        self.pending.retain(|entry| {
            if entry.0 <= now {
                expired.push(*entry);
                false
            } else {
                true
            }
        });
        expired.sort();
        expired.into_iter().map(|(_, handle)| handle).collect()
    }
}

impl Timer for TimerQueue {
    fn schedule(&mut self, delay: Duration) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle::new(self.next_id);
        self.pending.push((self.now.saturating_add(delay), handle));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(_, pending)| *pending != handle);
        self.pending.len() != before
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_in_due_order() {
        let mut queue = TimerQueue::new();
        let late = queue.schedule(Duration::from_millis(200));
        let early = queue.schedule(Duration::from_millis(50));

        assert!(queue.advance(Duration::from_millis(49)).is_empty());
        assert_eq!(queue.until_next(), Some(Duration::from_millis(1)));
        assert_eq!(
            queue.advance(Duration::from_millis(500)),
            vec![early, late]
        );
        assert!(queue.is_empty());
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule(Duration::from_millis(10));
        assert!(queue.cancel(handle));
        assert!(!queue.cancel(handle));
        assert!(queue.advance(Duration::from_secs(1)).is_empty());
    }
}
