//! Actuator task
//!
//! Owns the pump motor and release valve outputs. Applies timed writes
//! from the controller once due and enforces the max duration fallback:
//! if the controller's heartbeat stops, both outputs are forced to their
//! shutdown value and stay there until reset. Writes are only taken from
//! the channel while both outputs have room to queue them.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_rp::gpio::Output;
use embassy_time::Timer;

use vacuum_drivers::output::TimedOutput;

use crate::channels::{HEARTBEAT, PIN_WRITES};
use crate::tasks::controller::now_ms;

/// Queued writes per output
pub const OUTPUT_QUEUE_LEN: usize = 8;

/// How often due writes are applied (ms)
const UPDATE_INTERVAL_MS: u64 = 10;

/// Timed output on an RP2040 GPIO
pub type VacuumOutput = TimedOutput<Output<'static>, OUTPUT_QUEUE_LEN>;

/// Actuator task - applies pin writes for one zone
#[embassy_executor::task]
pub async fn actuator_task(mut motor: VacuumOutput, mut valve: VacuumOutput) {
    info!("Actuator task started");

    let mut tripped = false;

    loop {
        if motor.is_full() || valve.is_full() {
            Timer::after_millis(UPDATE_INTERVAL_MS).await;
        } else if let Either::First(write) = select(
            PIN_WRITES.receive(),
            Timer::after_millis(UPDATE_INTERVAL_MS),
        )
        .await
        {
            trace!("Queue {:?}", write);
            write.send_to(&mut motor, &mut valve);
        }

        if let Some(beat_ms) = HEARTBEAT.try_take() {
            motor.keepalive(beat_ms);
            valve.keepalive(beat_ms);
        }

        let now = now_ms();
        if let Err(e) = motor.update(now) {
            warn!("Pump motor output: {:?}", e);
        }
        if let Err(e) = valve.update(now) {
            warn!("Release valve output: {:?}", e);
        }

        let now_tripped = motor.is_tripped() || valve.is_tripped();
        if now_tripped && !tripped {
            error!(
                "Controller stalled, outputs forced to shutdown value (motor={}, valve={})",
                motor.value(),
                valve.value()
            );
        }
        tripped = now_tripped;
    }
}
