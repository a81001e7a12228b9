//! Control scheduling
//!
//! The poll scheduler evaluates the controller at a fixed cadence. Any
//! resulting actuation is deferred as a [`Continuation`] until the motion
//! scheduler supplies a concrete time for it.

pub mod poll;
pub mod settle;

pub use poll::{PollScheduler, DEFAULT_POLL_INTERVAL_MS};
pub use settle::{SettleQueue, PIN_MIN_TIME_MS};

use crate::control::SequenceKind;

/// Deferred actuation waiting for a start time
///
/// Once handed to a motion scheduler it always executes; there is no
/// cancellation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Continuation {
    /// Index of the zone that requested the sequence
    pub zone: u8,
    /// Sequence to run
    pub sequence: SequenceKind,
}

impl Continuation {
    /// Create a continuation for `zone`
    pub const fn new(zone: u8, sequence: SequenceKind) -> Self {
        Self { zone, sequence }
    }
}
