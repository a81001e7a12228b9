//! Settle queue
//!
//! A [`MotionScheduler`] for machines without a lookahead planner of
//! their own. Continuations are resolved in registration order to
//! `max(now + min_lead, horizon)`, where the horizon is the end of the
//! last resolved sequence. A full queue rejects new continuations and
//! keeps the ones it already accepted.

use heapless::Deque;

use super::Continuation;
use crate::traits::{MotionScheduler, ScheduleError};

/// Minimum lead time before an output may be commanded (ms)
pub const PIN_MIN_TIME_MS: u32 = 100;

/// Bounded queue of continuations awaiting a start time
pub struct SettleQueue<const N: usize> {
    pending: Deque<Continuation, N>,
    min_lead_ms: u32,
    horizon_ms: u64,
    rejected: u32,
}

impl<const N: usize> Default for SettleQueue<N> {
    fn default() -> Self {
        Self::new(PIN_MIN_TIME_MS)
    }
}

impl<const N: usize> SettleQueue<N> {
    /// Create an empty queue with the given minimum lead time
    pub const fn new(min_lead_ms: u32) -> Self {
        Self {
            pending: Deque::new(),
            min_lead_ms,
            horizon_ms: 0,
            rejected: 0,
        }
    }

    /// Resolve the oldest continuation against `now_ms`
    ///
    /// `span_ms` is how long the resolved sequence occupies the timeline;
    /// the next continuation starts no earlier than its end.
    pub fn resolve(&mut self, now_ms: u64, span_ms: u32) -> Option<(Continuation, u64)> {
        let continuation = self.pending.pop_front()?;
        let when_ms = now_ms
            .saturating_add(u64::from(self.min_lead_ms))
            .max(self.horizon_ms);
        self.horizon_ms = when_ms.saturating_add(u64::from(span_ms));
        trace!("Resolved {} at {}", continuation, when_ms);
        Some((continuation, when_ms))
    }

    /// Number of continuations waiting
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Check if nothing is waiting
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// End of the last resolved sequence
    pub fn horizon_ms(&self) -> u64 {
        self.horizon_ms
    }

    /// Continuations turned away because the queue was full
    pub fn rejected(&self) -> u32 {
        self.rejected
    }
}

impl<const N: usize> MotionScheduler for SettleQueue<N> {
    fn run_after_queue_settles(&mut self, continuation: Continuation) -> Result<(), ScheduleError> {
        self.pending.push_back(continuation).map_err(|rejected| {
            warn!("Settle queue full, rejecting {}", rejected);
            self.rejected = self.rejected.saturating_add(1);
            ScheduleError::QueueFull
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::SequenceKind;

    fn on(zone: u8) -> Continuation {
        Continuation::new(zone, SequenceKind::PowerOn)
    }

    fn off(zone: u8) -> Continuation {
        Continuation::new(zone, SequenceKind::PowerOff)
    }

    #[test]
    fn test_empty_resolves_nothing() {
        let mut queue: SettleQueue<4> = SettleQueue::default();
        assert!(queue.is_empty());
        assert_eq!(queue.resolve(1000, 1000), None);
    }

    #[test]
    fn test_min_lead_applied() {
        let mut queue: SettleQueue<4> = SettleQueue::default();
        queue.run_after_queue_settles(on(0)).unwrap();

        assert_eq!(queue.resolve(5_000, 1000), Some((on(0), 5_100)));
        assert_eq!(queue.horizon_ms(), 6_100);
    }

    #[test]
    fn test_sequences_never_overlap() {
        let mut queue: SettleQueue<4> = SettleQueue::default();
        queue.run_after_queue_settles(on(0)).unwrap();
        queue.run_after_queue_settles(off(0)).unwrap();
        assert_eq!(queue.len(), 2);

        let (_, first) = queue.resolve(0, 2000).unwrap();
        let (_, second) = queue.resolve(0, 2000).unwrap();

        assert_eq!(first, 100);
        assert_eq!(second, 2_100);
        assert!(queue.is_empty());
    }

    #[test]
    fn test_never_earlier_than_now() {
        let mut queue: SettleQueue<4> = SettleQueue::new(0);
        queue.run_after_queue_settles(on(0)).unwrap();
        queue.resolve(0, 1000);

        queue.run_after_queue_settles(off(0)).unwrap();
        assert_eq!(queue.resolve(50_000, 1000), Some((off(0), 50_000)));
    }

    #[test]
    fn test_full_queue_rejects_and_keeps_accepted() {
        let mut queue: SettleQueue<2> = SettleQueue::default();
        queue.run_after_queue_settles(on(0)).unwrap();
        queue.run_after_queue_settles(off(0)).unwrap();

        assert_eq!(
            queue.run_after_queue_settles(on(1)),
            Err(ScheduleError::QueueFull)
        );
        assert_eq!(queue.rejected(), 1);
        assert_eq!(queue.len(), 2);

        assert_eq!(queue.resolve(0, 0).map(|(c, _)| c), Some(on(0)));
        assert_eq!(queue.resolve(0, 0).map(|(c, _)| c), Some(off(0)));
        assert!(queue.is_empty());

        // Room again once drained
        assert_eq!(queue.run_after_queue_settles(on(1)), Ok(()));
    }
}
