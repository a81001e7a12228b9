//! Vacuum controller task
//!
//! Owns the zone, its settle queue and its poll timer. Poll deadlines,
//! console commands and sensor samples are taken one at a time, so every
//! handler runs to completion before the next event is looked at. The
//! settle queue is drained after every event and pin writes wait for room
//! in the channel, so no sequence is cut short.

use defmt::*;
use embassy_futures::select::{select3, Either3};
use embassy_time::{Instant, Timer};

use vacuum_core::config::VacuumConfig;
use vacuum_core::traits::{self, SampleSink};
use vacuum_core::{SettleQueue, VacuumZone};

use crate::channels::{publish_status, COMMAND_CHANNEL, HEARTBEAT, PIN_WRITES, PRESSURE_SAMPLE};

/// Continuations waiting for a start time
const SETTLE_QUEUE_LEN: usize = 8;

/// Milliseconds since boot
pub fn now_ms() -> u64 {
    Instant::now().as_millis()
}

/// Poll deadline re-armed by the zone after every tick
struct PollTimer {
    next_ms: u64,
}

impl traits::Timer for PollTimer {
    fn reschedule(&mut self, next_ms: u64) {
        self.next_ms = next_ms;
    }
}

/// Controller task - single event context for one vacuum zone
#[embassy_executor::task]
pub async fn controller_task(config: VacuumConfig) {
    let mut zone = VacuumZone::new(0, &config);
    info!(
        "Vacuum controller started: zone {} {} (band {}..{})",
        zone.index(),
        zone.name(),
        config.minimum_vacuum,
        config.maximum_vacuum
    );

    let mut motion = SettleQueue::<SETTLE_QUEUE_LEN>::default();
    let mut timer = PollTimer { next_ms: now_ms() };

    loop {
        let event = select3(
            Timer::at(Instant::from_millis(timer.next_ms)),
            COMMAND_CHANNEL.receive(),
            PRESSURE_SAMPLE.wait(),
        )
        .await;

        let now = now_ms();
        match event {
            Either3::First(()) => {
                zone.poll(now, &mut motion, &mut timer);
                HEARTBEAT.signal(now);
            }
            Either3::Second(command) => {
                info!("Command: {}", command.name());
                if let Err(e) = zone.handle(command, &mut motion) {
                    error!("{} not scheduled: {:?}", command.name(), e);
                }
            }
            Either3::Third((read_time_ms, value)) => {
                zone.on_sample(read_time_ms, value);
            }
        }

        // Hand every settled continuation its start time
        let span_ms = zone.sequencer().inter_actuator_delay_ms();
        while let Some((continuation, when_ms)) = motion.resolve(now, span_ms) {
            let Some(writes) = zone.writes_for(continuation, when_ms) else {
                continue;
            };
            for write in writes {
                PIN_WRITES.send(write).await;
            }
        }

        publish_status(zone.status());
    }
}
