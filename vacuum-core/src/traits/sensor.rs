//! Analog sensor traits

/// Errors that can occur with pressure sensing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// Sensor shorted to ground
    ShortCircuit,
    /// ADC conversion error
    ConversionError,
}

/// Receiver of analog samples
///
/// The analog input abstraction owns sampling cadence and filtering and
/// delivers one normalized value (nominally 0.0 to 1.0) per report.
pub trait SampleSink {
    /// Handle a sample taken at `read_time_ms`
    fn on_sample(&mut self, read_time_ms: u64, value: f32);
}
