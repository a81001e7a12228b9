//! Pressure sensor calibration
//!
//! Maps the sensor's usable analog range onto the pressure scale with a
//! fixed affine transform. Out-of-range inputs are not clamped; they
//! extrapolate along the same line.

/// Affine map from a normalized analog reading to pressure
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinearCalibration {
    /// Normalized reading that maps to `output_low`
    pub input_low: f32,
    /// Normalized reading that maps to `output_high`
    pub input_high: f32,
    /// Pressure at `input_low`
    pub output_low: f32,
    /// Pressure at `input_high`
    pub output_high: f32,
}

impl LinearCalibration {
    /// Vacuum line transducer: 0.1..0.99999 of full scale onto 0..30
    pub const VACUUM_SENSOR: Self = Self {
        input_low: 0.1,
        input_high: 0.99999,
        output_low: 0.0,
        output_high: 30.0,
    };

    /// Convert a normalized reading to pressure
    pub fn apply(&self, raw: f32) -> f32 {
        (raw - self.input_low) * (self.output_high - self.output_low)
            / (self.input_high - self.input_low)
            + self.output_low
    }
}

impl Default for LinearCalibration {
    fn default() -> Self {
        Self::VACUUM_SENSOR
    }
}

/// Convert a normalized reading with the vacuum sensor calibration
pub fn calibrate(raw: f32) -> f32 {
    LinearCalibration::VACUUM_SENSOR.apply(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_point() {
        assert_eq!(calibrate(0.1), 0.0);
    }

    #[test]
    fn test_full_scale() {
        let p = calibrate(0.99999);
        assert!(p > 29.9999 && p < 30.0001);
    }

    #[test]
    fn test_below_zero_point_is_negative() {
        // No clamping: the line extends below the usable range
        let p = calibrate(0.0);
        assert!(p > -3.3344 && p < -3.3323);
    }

    proptest! {
        #[test]
        fn monotonic_over_unit_range(a in 0.0f32..=1.0, b in 0.0f32..=1.0) {
            prop_assume!(a + 1e-4 < b || b + 1e-4 < a);
            let (lo, hi) = if a < b { (a, b) } else { (b, a) };
            prop_assert!(calibrate(lo) < calibrate(hi));
        }
    }
}
