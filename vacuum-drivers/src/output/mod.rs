//! Digital output implementations

pub mod timed;

pub use timed::{ActuatorError, TimedOutput};
