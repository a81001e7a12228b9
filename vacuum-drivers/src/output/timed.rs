//! Timed digital output
//!
//! Queues writes against the motion timeline and applies them once due.
//! Optionally enforces a maximum duration: if the output holds a value
//! other than its shutdown value and nothing refreshes it within
//! `max_duration_ms`, the shutdown value is forced and the output latches
//! in the tripped state until [`TimedOutput::clear_fault`].
//!
//! # Usage
//!
//! ```ignore
//! let mut pump = TimedOutput::<_, 8>::new(pin, false, config.actuator_setup())?;
//! pump.set_digital(when_ms, true);
//!
//! // Periodically:
//! pump.update(now_ms)?;
//! // From the control loop, while it is alive:
//! pump.keepalive(now_ms);
//! ```

use embedded_hal::digital::{OutputPin, PinState};
use heapless::Deque;

use vacuum_core::traits::{ActuatorSetup, DigitalOutput};

/// Errors that can occur driving an output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ActuatorError {
    /// The underlying pin rejected a write
    Pin,
}

/// Digital output with a queue of timed writes
pub struct TimedOutput<P, const N: usize> {
    pin: P,
    /// If true, logical on = pin LOW
    inverted: bool,
    setup: ActuatorSetup,
    pending: Deque<(u64, bool), N>,
    /// Current logical value
    value: bool,
    last_refresh_ms: u64,
    tripped: bool,
    overflowed: u32,
}

impl<P: OutputPin, const N: usize> TimedOutput<P, N> {
    /// Create an output and drive its start value
    ///
    /// # Arguments
    /// - `pin`: The GPIO pin to control
    /// - `inverted`: If true, the output is on when the pin is LOW
    /// - `setup`: Start value, shutdown value and max duration
    pub fn new(pin: P, inverted: bool, setup: ActuatorSetup) -> Result<Self, ActuatorError> {
        let mut output = Self {
            pin,
            inverted,
            setup,
            pending: Deque::new(),
            value: setup.start_value,
            last_refresh_ms: 0,
            tripped: false,
            overflowed: 0,
        };
        output.drive(setup.start_value)?;
        Ok(output)
    }

    /// Apply every write due at `now_ms` and enforce the max duration
    pub fn update(&mut self, now_ms: u64) -> Result<(), ActuatorError> {
        if self.tripped {
            return Ok(());
        }

        while let Some(&(at_ms, value)) = self.pending.front() {
            if at_ms > now_ms {
                break;
            }
            self.pending.pop_front();
            self.drive(value)?;
            // A write never moves the refresh time backwards
            self.last_refresh_ms = self.last_refresh_ms.max(at_ms);
        }

        if self.max_duration_expired(now_ms) {
            #[cfg(feature = "defmt")]
            defmt::warn!(
                "Output not refreshed for {} ms, forcing shutdown value",
                self.setup.max_duration_ms
            );
            self.pending.clear();
            self.tripped = true;
            self.drive(self.setup.shutdown_value)?;
        }

        Ok(())
    }

    /// Mark the output as refreshed at `now_ms`
    ///
    /// Called by the control loop at least every resend interval while
    /// it is alive.
    pub fn keepalive(&mut self, now_ms: u64) {
        self.last_refresh_ms = self.last_refresh_ms.max(now_ms);
    }

    /// Leave the tripped state and restart the max duration window
    ///
    /// The output keeps its shutdown value until the next write.
    pub fn clear_fault(&mut self, now_ms: u64) {
        self.tripped = false;
        self.pending.clear();
        self.last_refresh_ms = now_ms;
    }

    /// Time of the next queued write
    pub fn next_due_ms(&self) -> Option<u64> {
        self.pending.front().map(|&(at_ms, _)| at_ms)
    }

    /// Check if another write would push out the oldest one
    pub fn is_full(&self) -> bool {
        self.pending.is_full()
    }

    /// Current logical value
    pub fn value(&self) -> bool {
        self.value
    }

    /// Check if the max duration fallback has fired
    pub fn is_tripped(&self) -> bool {
        self.tripped
    }

    /// Writes discarded because the queue was full
    pub fn overflowed(&self) -> u32 {
        self.overflowed
    }

    /// Get access to the underlying pin
    pub fn pin(&self) -> &P {
        &self.pin
    }

    fn max_duration_expired(&self, now_ms: u64) -> bool {
        self.setup.max_duration_ms != 0
            && self.value != self.setup.shutdown_value
            && now_ms.saturating_sub(self.last_refresh_ms) >= u64::from(self.setup.max_duration_ms)
    }

    fn drive(&mut self, value: bool) -> Result<(), ActuatorError> {
        self.value = value;
        // Normal: on=true, inverted=false → high
        // Inverted: on=true, inverted=true → low
        self.pin
            .set_state(PinState::from(value != self.inverted))
            .map_err(|_| ActuatorError::Pin)
    }
}

impl<P: OutputPin, const N: usize> DigitalOutput for TimedOutput<P, N> {
    /// Queue a write
    ///
    /// Writes stay in time order: one scheduled before the last queued
    /// write is moved up to that time. When the queue is full the oldest
    /// write is discarded. Writes are ignored while tripped.
    fn set_digital(&mut self, at_ms: u64, value: bool) {
        if self.tripped {
            return;
        }

        let at_ms = match self.pending.back() {
            Some(&(last_ms, _)) => at_ms.max(last_ms),
            None => at_ms,
        };

        if self.pending.is_full() {
            self.pending.pop_front();
            self.overflowed = self.overflowed.saturating_add(1);
        }
        // Cannot fail: a slot was freed above
        let _ = self.pending.push_back((at_ms, value));
    }
}
