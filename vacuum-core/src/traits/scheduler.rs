//! Scheduling traits
//!
//! Actuation is ordered against the motion timeline, not wall-clock time.
//! The core never writes pins directly: it hands a [`Continuation`] to the
//! motion scheduler, which runs it once with a concrete timestamp.

use crate::scheduler::Continuation;

/// Errors registering a continuation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleError {
    /// No room for another continuation
    QueueFull,
}

/// Motion lookahead scheduler
pub trait MotionScheduler {
    /// Register `continuation` to run once all motion queued so far settles
    ///
    /// An accepted continuation is executed exactly once, with a timestamp
    /// no earlier than now and no earlier than the end of every motion
    /// command queued at registration time. A rejected one is never run.
    fn run_after_queue_settles(&mut self, continuation: Continuation) -> Result<(), ScheduleError>;
}

/// Re-armable timer driving a periodic callback
pub trait Timer {
    /// Request the next invocation at `next_ms`
    fn reschedule(&mut self, next_ms: u64);
}
