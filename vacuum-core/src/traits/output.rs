//! Digital output traits
//!
//! The pump motor and release valve are both plain on/off outputs. The
//! output abstraction owns actuation latency and the max-duration
//! fallback; the core only hands it timed writes.

/// Which actuator of a zone a write targets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Actuator {
    /// Vacuum pump motor
    Motor,
    /// Release valve
    Valve,
}

/// Setup parameters handed to an output at configuration time
///
/// If no update is seen within `max_duration_ms` the output forces
/// `shutdown_value`. A `max_duration_ms` of zero disables the fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ActuatorSetup {
    /// Maximum time without an update before falling back (ms, 0 = disabled)
    pub max_duration_ms: u32,
    /// Value applied at startup
    pub start_value: bool,
    /// Value forced when the max duration elapses
    pub shutdown_value: bool,
}

/// Timed digital output
///
/// Implementations schedule the write for `at_ms` on the motion timeline.
/// Writes for the same output are issued in non-decreasing time order.
pub trait DigitalOutput {
    /// Schedule `value` to take effect at `at_ms`
    fn set_digital(&mut self, at_ms: u64, value: bool);
}
