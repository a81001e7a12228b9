//! Pressure sensor task
//!
//! Oversamples the vacuum transducer on the ADC and forwards each report
//! to the controller. Sensor faults are logged and the report dropped; the
//! controller keeps its last reading.

use defmt::*;
use embassy_rp::adc::{Adc, Async, Channel};
use embassy_time::{Duration, Ticker, Timer};

use vacuum_core::config::AdcSampling;
use vacuum_core::traits::{SampleSink, SensorError};
use vacuum_drivers::sensor::{Oversampler, ADC_FULL_SCALE_12BIT};

use crate::channels::PRESSURE_SAMPLE;
use crate::tasks::controller::now_ms;

/// Forwards completed reports to the controller
struct SignalSink;

impl SampleSink for SignalSink {
    fn on_sample(&mut self, read_time_ms: u64, value: f32) {
        PRESSURE_SAMPLE.signal((read_time_ms, value));
    }
}

/// Sensor task - one report every `report_time_ms`
#[embassy_executor::task]
pub async fn sensor_task(
    mut adc: Adc<'static, Async>,
    mut channel: Channel<'static>,
    sampling: AdcSampling,
) {
    info!(
        "Sensor task started ({} samples every {} ms)",
        sampling.sample_count, sampling.report_time_ms
    );

    let mut filter = Oversampler::new(&sampling, ADC_FULL_SCALE_12BIT);
    let mut sink = SignalSink;
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(sampling.report_time_ms)));
    let spacing = Duration::from_micros(u64::from(sampling.sample_time_us));

    loop {
        ticker.next().await;
        filter.reset();

        for _ in 0..filter.sample_count() {
            let raw = match adc.read(&mut channel).await {
                Ok(raw) => raw,
                Err(_) => {
                    warn!("Pressure sensor: {:?}", SensorError::ConversionError);
                    filter.reset();
                    break;
                }
            };

            if let Err(e) = filter.push_to(raw, now_ms(), &mut sink) {
                warn!("Pressure sensor: {:?}", e);
            }

            Timer::after(spacing).await;
        }
    }
}
