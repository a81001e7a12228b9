//! Pressure sensor oversampling
//!
//! Averages a fixed number of ADC conversions into one normalized report
//! (0.0 to 1.0 of full scale) and hands it to a [`SampleSink`]. The filter
//! does not touch the ADC itself, so it works with blocking and async
//! conversions alike.
//!
//! A vacuum transducer idles at roughly 10% of full scale, so an average
//! near zero means the signal line is shorted. Full scale is a legitimate
//! reading (deep vacuum) and is not treated as a fault.

use vacuum_core::config::AdcSampling;
use vacuum_core::traits::{SampleSink, SensorError};

/// Full scale of the RP2040 12-bit ADC
pub const ADC_FULL_SCALE_12BIT: u16 = 4095;

/// Averages below this many counts are reported as a short
const SHORT_CIRCUIT_COUNTS: u32 = 10;

/// Accumulates conversions into normalized reports
#[derive(Debug, Clone)]
pub struct Oversampler {
    sample_count: u8,
    full_scale: u16,
    sum: u32,
    taken: u8,
}

impl Oversampler {
    /// Create a filter for the given sampling parameters
    ///
    /// A `sample_count` of zero is treated as one.
    pub fn new(sampling: &AdcSampling, full_scale: u16) -> Self {
        Self {
            sample_count: sampling.sample_count.max(1),
            full_scale: full_scale.max(1),
            sum: 0,
            taken: 0,
        }
    }

    /// Add one conversion
    ///
    /// Returns the normalized average once `sample_count` conversions
    /// have been collected, then starts a new report.
    pub fn push(&mut self, raw: u16) -> Option<Result<f32, SensorError>> {
        self.sum += u32::from(raw.min(self.full_scale));
        self.taken += 1;

        if self.taken < self.sample_count {
            return None;
        }

        let average = self.sum / u32::from(self.taken);
        let normalized = self.sum as f32 / (u32::from(self.taken) * u32::from(self.full_scale)) as f32;
        self.reset();

        if average < SHORT_CIRCUIT_COUNTS {
            Some(Err(SensorError::ShortCircuit))
        } else {
            Some(Ok(normalized))
        }
    }

    /// Add one conversion and deliver a completed report to `sink`
    pub fn push_to<S: SampleSink>(
        &mut self,
        raw: u16,
        read_time_ms: u64,
        sink: &mut S,
    ) -> Result<(), SensorError> {
        match self.push(raw) {
            Some(Ok(value)) => {
                sink.on_sample(read_time_ms, value);
                Ok(())
            }
            Some(Err(e)) => Err(e),
            None => Ok(()),
        }
    }

    /// Discard a partial report
    pub fn reset(&mut self) {
        self.sum = 0;
        self.taken = 0;
    }

    /// Conversions per report
    pub fn sample_count(&self) -> u8 {
        self.sample_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[derive(Default)]
    struct RecordingSink {
        samples: Vec<(u64, f32)>,
    }

    impl SampleSink for RecordingSink {
        fn on_sample(&mut self, read_time_ms: u64, value: f32) {
            self.samples.push((read_time_ms, value));
        }
    }

    fn oversampler() -> Oversampler {
        Oversampler::new(&AdcSampling::default(), ADC_FULL_SCALE_12BIT)
    }

    #[test]
    fn test_reports_after_sample_count() {
        let mut filter = oversampler();
        assert_eq!(filter.sample_count(), 6);

        for _ in 0..5 {
            assert_eq!(filter.push(4095), None);
        }
        assert_eq!(filter.push(4095), Some(Ok(1.0)));

        // Next report starts fresh
        assert_eq!(filter.push(0), None);
    }

    #[test]
    fn test_average_is_normalized() {
        let sampling = AdcSampling {
            sample_count: 2,
            ..Default::default()
        };
        let mut filter = Oversampler::new(&sampling, 1000);

        assert_eq!(filter.push(100), None);
        assert_eq!(filter.push(300), Some(Ok(0.2)));
    }

    #[test]
    fn test_over_range_is_clamped() {
        let sampling = AdcSampling {
            sample_count: 1,
            ..Default::default()
        };
        let mut filter = Oversampler::new(&sampling, 1000);
        assert_eq!(filter.push(u16::MAX), Some(Ok(1.0)));
    }

    #[test]
    fn test_short_circuit() {
        let mut filter = oversampler();
        let mut result = None;
        for _ in 0..6 {
            result = filter.push(3);
        }
        assert_eq!(result, Some(Err(SensorError::ShortCircuit)));
    }

    #[test]
    fn test_push_to_delivers_reports() {
        let sampling = AdcSampling {
            sample_count: 2,
            ..Default::default()
        };
        let mut filter = Oversampler::new(&sampling, 1000);
        let mut sink = RecordingSink::default();

        filter.push_to(500, 10, &mut sink).unwrap();
        assert!(sink.samples.is_empty());

        filter.push_to(500, 20, &mut sink).unwrap();
        assert_eq!(sink.samples, [(20, 0.5)]);

        filter.push_to(0, 30, &mut sink).unwrap();
        assert_eq!(
            filter.push_to(0, 40, &mut sink),
            Err(SensorError::ShortCircuit)
        );
        assert_eq!(sink.samples.len(), 1);
    }
}
