//! Periodic controller evaluation
//!
//! Runs independently of sensor sampling: samples only update the stored
//! pressure, and actuation is decided solely on poll ticks.

use super::Continuation;
use crate::control::{ControllerState, SequenceKind};
use crate::traits::{MotionScheduler, ScheduleError};

/// Default poll interval in milliseconds
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 1250;

/// Self re-arming poll timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PollScheduler {
    poll_interval_ms: u32,
}

impl Default for PollScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL_MS)
    }
}

impl PollScheduler {
    /// Create a poll scheduler with the given period
    pub const fn new(poll_interval_ms: u32) -> Self {
        Self { poll_interval_ms }
    }

    /// Poll period
    pub fn poll_interval_ms(&self) -> u32 {
        self.poll_interval_ms
    }

    /// Evaluate `state` once and return the next tick time
    ///
    /// A decision is handed to `motion` as a continuation for `zone`; it
    /// runs once all currently queued motion settles. If `motion` rejects
    /// it, the decision is withdrawn and retried on the next tick.
    pub fn tick<S: MotionScheduler>(
        &self,
        now_ms: u64,
        zone: u8,
        state: &mut ControllerState,
        motion: &mut S,
    ) -> u64 {
        if let Some(decision) = state.evaluate() {
            debug!(
                "Zone {}: {} at pressure {}",
                zone,
                decision,
                state.absolute_pressure()
            );
            let continuation = Continuation::new(zone, SequenceKind::from(decision));
            if let Err(e) = motion.run_after_queue_settles(continuation) {
                warn!("Zone {}: {} not scheduled: {}", zone, decision, e);
                state.withdraw(decision);
            }
        }

        now_ms.saturating_add(u64::from(self.poll_interval_ms))
    }
}
