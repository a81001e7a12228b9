//! Closed-loop vacuum control
//!
//! - [`calibration`]: raw analog sample to pressure
//! - [`hysteresis`]: bang-bang decision logic over a pressure band
//! - [`sequence`]: ordered, timed motor/valve writes for each action

pub mod calibration;
pub mod hysteresis;
pub mod sequence;

pub use calibration::{calibrate, LinearCalibration};
pub use hysteresis::{ControllerState, Decision, UNREAD_PRESSURE};
pub use sequence::{PinWrite, SequenceKind, Sequencer};
