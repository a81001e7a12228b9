//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod actuator;
pub mod console;
pub mod controller;
pub mod sensor;

pub use actuator::{actuator_task, VacuumOutput};
pub use console::console_task;
pub use controller::controller_task;
pub use sensor::sensor_task;
