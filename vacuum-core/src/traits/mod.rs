//! Hardware abstraction traits
//!
//! These traits define the interface between the control logic and the
//! collaborators it consumes: pin abstractions and the motion scheduler.

pub mod output;
pub mod scheduler;
pub mod sensor;

pub use output::{Actuator, ActuatorSetup, DigitalOutput};
pub use scheduler::{MotionScheduler, ScheduleError, Timer};
pub use sensor::{SampleSink, SensorError};
