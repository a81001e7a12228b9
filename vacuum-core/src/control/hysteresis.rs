//! Bang-bang vacuum controller
//!
//! Turns the pump on when the absolute pressure falls below the minimum
//! threshold and off when it rises above the maximum threshold. Inside
//! the band the current state is held.
//!
//! Comparisons are strict: a reading exactly on a threshold takes no
//! action.

/// Pressure value meaning "no sample received yet"
pub const UNREAD_PRESSURE: f32 = -1.0;

/// Control decision produced by [`ControllerState::evaluate`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Decision {
    /// Start the pump and open the line
    PowerOn,
    /// Close the line and stop the pump
    PowerOff,
}

/// Per-zone controller state
///
/// `running` is what the controller last commanded, not a hardware
/// readback. It only exists to suppress redundant sequences.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ControllerState {
    raw_pressure: f32,
    absolute_pressure: f32,
    activated: bool,
    running: bool,
    min_threshold: f32,
    max_threshold: f32,
}

impl ControllerState {
    /// Create a deactivated, unread controller for the given band
    pub fn new(min_threshold: f32, max_threshold: f32) -> Self {
        Self {
            raw_pressure: UNREAD_PRESSURE,
            absolute_pressure: abs(UNREAD_PRESSURE),
            activated: false,
            running: false,
            min_threshold,
            max_threshold,
        }
    }

    /// Store a calibrated pressure reading
    pub fn update_pressure(&mut self, raw_pressure: f32) {
        self.raw_pressure = raw_pressure;
        self.absolute_pressure = abs(raw_pressure);
    }

    /// Decide whether the pump state must change
    ///
    /// Sets `running` to match the returned decision.
    pub fn evaluate(&mut self) -> Option<Decision> {
        if !self.activated {
            return None;
        }

        if self.absolute_pressure < self.min_threshold && !self.running {
            self.running = true;
            Some(Decision::PowerOn)
        } else if self.absolute_pressure > self.max_threshold && self.running {
            self.running = false;
            Some(Decision::PowerOff)
        } else {
            None
        }
    }

    /// Undo the `running` change of a decision that was never scheduled
    ///
    /// The next [`evaluate`](Self::evaluate) issues the decision again if
    /// the pressure still calls for it.
    pub fn withdraw(&mut self, decision: Decision) {
        self.running = decision == Decision::PowerOff;
    }

    /// Enable or disable automatic control
    ///
    /// Both directions clear `running`: enabling starts from a known-off
    /// state, disabling is followed by an unconditional power-off.
    pub fn set_activated(&mut self, activated: bool) {
        self.activated = activated;
        self.running = false;
    }

    /// Last calibrated pressure (signed)
    pub fn raw_pressure(&self) -> f32 {
        self.raw_pressure
    }

    /// Magnitude of the last pressure reading
    pub fn absolute_pressure(&self) -> f32 {
        self.absolute_pressure
    }

    /// Check if automatic control is enabled
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Check if the pump was last commanded on
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Lower band edge
    pub fn min_threshold(&self) -> f32 {
        self.min_threshold
    }

    /// Upper band edge
    pub fn max_threshold(&self) -> f32 {
        self.max_threshold
    }
}

fn abs(value: f32) -> f32 {
    if value < 0.0 {
        -value
    } else {
        value
    }
}
