//! Zone status reporting
//!
//! Advisory snapshot for telemetry and UI. `pressure` is the signed
//! calibrated reading, or the unread sentinel before the first sample.
//! `raw_sample` is the normalized analog value behind it.

/// Snapshot of one zone
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ZoneStatus {
    /// Last calibrated pressure (signed)
    pub pressure: f32,
    /// Magnitude of `pressure`
    pub absolute_pressure: f32,
    /// Automatic control enabled
    pub activated: bool,
    /// Pump last commanded on
    pub running: bool,
    /// Last normalized analog sample, before calibration
    pub raw_sample: Option<f32>,
    /// Time of the last sample
    pub sampled_at_ms: Option<u64>,
}
