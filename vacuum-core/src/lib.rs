//! Board-agnostic core logic for the vacuum zone controller
//!
//! This crate contains all application logic that does not depend on
//! specific hardware implementations:
//!
//! - Hardware abstraction traits (timed outputs, sample sink, motion scheduler)
//! - Pressure calibration and hysteresis control
//! - Actuation sequencing for the pump motor and release valve
//! - Poll scheduler and settle queue
//! - Operator command surface and per-zone wiring
//! - Configuration types and text parsing

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

#[macro_use]
mod fmt;

pub mod command;
pub mod config;
pub mod control;
pub mod scheduler;
pub mod status;
pub mod traits;
pub mod zone;

pub use command::{Command, CommandError};
pub use control::{calibrate, ControllerState, Decision, PinWrite, SequenceKind, Sequencer};
pub use scheduler::{Continuation, PollScheduler, SettleQueue};
pub use status::ZoneStatus;
pub use zone::VacuumZone;
