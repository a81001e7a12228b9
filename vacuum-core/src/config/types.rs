//! Vacuum zone configuration types
//!
//! Durations are stored in milliseconds. The text config expresses them
//! in seconds; conversion happens at parse time.

use heapless::String;

use crate::scheduler::DEFAULT_POLL_INTERVAL_MS;
use crate::traits::ActuatorSetup;

use super::hardware::PinConfig;

/// Maximum label length
pub const MAX_LABEL_LEN: usize = 16;

/// Shortest accepted non-zero max duration (ms)
pub const MIN_MAX_DURATION_MS: u32 = 500;

/// Longest time an output may be scheduled ahead (ms)
pub const MAX_SCHEDULE_TIME_MS: u32 = 5000;

/// Host-side margin before the max duration expires (ms)
///
/// Outputs must be refreshed at least this long before the fallback
/// would trigger.
pub const RESEND_HOST_TIME_MS: u32 = 300 + crate::scheduler::PIN_MIN_TIME_MS;

/// Default spacing between the motor and valve writes (ms)
pub const DEFAULT_INTER_ACTUATOR_DELAY_MS: u32 = 1000;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Minimum threshold above maximum threshold
    InvertedBand,
    /// Threshold is not a finite number
    InvalidThreshold,
    /// Max duration outside 500..=5000 ms (and not zero)
    MaxDurationOutOfRange,
    /// Inter-actuator delay of zero
    ZeroDelay,
    /// Poll interval of zero
    ZeroPollInterval,
    /// ADC sample count of zero
    ZeroSampleCount,
    /// Poll interval longer than the output refresh interval
    PollSlowerThanRefresh,
}

/// ADC sampling parameters for the pressure sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AdcSampling {
    /// Time between conversions within one report (µs)
    pub sample_time_us: u32,
    /// Conversions averaged into one report
    pub sample_count: u8,
    /// Time between reports (ms)
    pub report_time_ms: u32,
}

impl Default for AdcSampling {
    fn default() -> Self {
        Self {
            sample_time_us: 1000,
            sample_count: 6,
            report_time_ms: 500,
        }
    }
}

/// One vacuum zone: one sensor, one pump motor, one release valve
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VacuumConfig {
    /// Zone name (from the `[vacuum <name>]` section header)
    pub name: String<MAX_LABEL_LEN>,
    /// Pump motor output
    pub pump_pin: PinConfig,
    /// Release valve output
    pub valve_pin: PinConfig,
    /// Pressure sensor ADC pin
    pub sensor_pin: u8,
    /// Pump turns on below this absolute pressure
    pub minimum_vacuum: f32,
    /// Pump turns off above this absolute pressure
    pub maximum_vacuum: f32,
    /// Output max duration (ms, 0 = no fallback)
    pub max_duration_ms: u32,
    /// Output value at startup
    pub start_value: bool,
    /// Output value forced when the max duration elapses
    pub shutdown_value: bool,
    /// Spacing between motor and valve writes (ms)
    pub inter_actuator_delay_ms: u32,
    /// Controller evaluation period (ms)
    pub poll_interval_ms: u32,
    /// Sensor sampling parameters
    pub sampling: AdcSampling,
}

impl Default for VacuumConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            pump_pin: PinConfig::default(),
            valve_pin: PinConfig::default(),
            sensor_pin: 0,
            minimum_vacuum: 0.0,
            maximum_vacuum: 0.0,
            max_duration_ms: 0,
            start_value: false,
            shutdown_value: false,
            inter_actuator_delay_ms: DEFAULT_INTER_ACTUATOR_DELAY_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            sampling: AdcSampling::default(),
        }
    }
}

impl VacuumConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.minimum_vacuum.is_finite() || !self.maximum_vacuum.is_finite() {
            return Err(ConfigError::InvalidThreshold);
        }
        if self.minimum_vacuum > self.maximum_vacuum {
            return Err(ConfigError::InvertedBand);
        }
        if self.max_duration_ms != 0
            && !(MIN_MAX_DURATION_MS..=MAX_SCHEDULE_TIME_MS).contains(&self.max_duration_ms)
        {
            return Err(ConfigError::MaxDurationOutOfRange);
        }
        if self.inter_actuator_delay_ms == 0 {
            return Err(ConfigError::ZeroDelay);
        }
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if self.sampling.sample_count == 0 {
            return Err(ConfigError::ZeroSampleCount);
        }
        // Outputs are refreshed from the poll loop
        if let Some(resend_ms) = self.resend_interval_ms() {
            if self.poll_interval_ms > resend_ms {
                return Err(ConfigError::PollSlowerThanRefresh);
            }
        }
        Ok(())
    }

    /// Setup parameters shared by the pump and valve outputs
    pub fn actuator_setup(&self) -> ActuatorSetup {
        ActuatorSetup {
            max_duration_ms: self.max_duration_ms,
            start_value: self.start_value,
            shutdown_value: self.shutdown_value,
        }
    }

    /// How often outputs must be refreshed to hold their value
    ///
    /// `None` when the max duration fallback is disabled.
    pub fn resend_interval_ms(&self) -> Option<u32> {
        if self.max_duration_ms == 0 {
            None
        } else {
            Some(self.max_duration_ms.saturating_sub(RESEND_HOST_TIME_MS))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zone() -> VacuumConfig {
        VacuumConfig {
            minimum_vacuum: 5.0,
            maximum_vacuum: 20.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let config = VacuumConfig::default();
        assert_eq!(config.inter_actuator_delay_ms, 1000);
        assert_eq!(config.poll_interval_ms, 1250);
        assert_eq!(config.sampling.sample_count, 6);
        assert_eq!(config.sampling.report_time_ms, 500);
    }

    #[test]
    fn test_valid_zone() {
        assert_eq!(zone().validate(), Ok(()));
    }

    #[test]
    fn test_inverted_band_rejected() {
        let config = VacuumConfig {
            minimum_vacuum: 25.0,
            ..zone()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvertedBand));
    }

    #[test]
    fn test_nan_threshold_rejected() {
        let config = VacuumConfig {
            maximum_vacuum: f32::NAN,
            ..zone()
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidThreshold));
    }

    #[test]
    fn test_max_duration_bounds() {
        for (duration, ok) in [(0, true), (499, false), (500, true), (5000, true), (5001, false)] {
            let config = VacuumConfig {
                max_duration_ms: duration,
                poll_interval_ms: 100,
                ..zone()
            };
            assert_eq!(config.validate().is_ok(), ok, "duration {}", duration);
        }
    }

    #[test]
    fn test_zero_timings_rejected() {
        let config = VacuumConfig {
            inter_actuator_delay_ms: 0,
            ..zone()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroDelay));

        let config = VacuumConfig {
            poll_interval_ms: 0,
            ..zone()
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroPollInterval));
    }

    #[test]
    fn test_poll_must_outpace_refresh() {
        let config = VacuumConfig {
            max_duration_ms: 1000,
            ..zone()
        };
        assert_eq!(config.validate(), Err(ConfigError::PollSlowerThanRefresh));

        let config = VacuumConfig {
            max_duration_ms: 2000,
            ..zone()
        };
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_resend_interval() {
        assert_eq!(zone().resend_interval_ms(), None);

        let config = VacuumConfig {
            max_duration_ms: 2000,
            ..zone()
        };
        assert_eq!(config.resend_interval_ms(), Some(1600));
    }

    #[test]
    fn test_actuator_setup() {
        let config = VacuumConfig {
            max_duration_ms: 1500,
            shutdown_value: false,
            start_value: false,
            ..zone()
        };
        let setup = config.actuator_setup();
        assert_eq!(setup.max_duration_ms, 1500);
        assert!(!setup.shutdown_value);
    }
}
