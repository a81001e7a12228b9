//! Sensor implementations

pub mod pressure;

pub use pressure::{Oversampler, ADC_FULL_SCALE_12BIT};
