//! Vacuum zone
//!
//! One zone owns its controller state and wires the calibrator, poll
//! scheduler, sequencer and command surface together. All entry points
//! take `&mut self` and run to completion; the caller guarantees they
//! execute on a single event context.

use heapless::String;

use crate::command::Command;
use crate::config::{VacuumConfig, MAX_LABEL_LEN};
use crate::control::{ControllerState, LinearCalibration, PinWrite, SequenceKind, Sequencer};
use crate::scheduler::{Continuation, PollScheduler};
use crate::status::ZoneStatus;
use crate::traits::{DigitalOutput, MotionScheduler, SampleSink, ScheduleError, Timer};

/// A configured vacuum zone
#[derive(Debug, Clone)]
pub struct VacuumZone {
    index: u8,
    name: String<MAX_LABEL_LEN>,
    calibration: LinearCalibration,
    state: ControllerState,
    sequencer: Sequencer,
    poller: PollScheduler,
    /// Time and normalized value of the last sample
    last_sample: Option<(u64, f32)>,
}

impl VacuumZone {
    /// Create zone number `index` from its configuration
    pub fn new(index: u8, config: &VacuumConfig) -> Self {
        Self {
            index,
            name: config.name.clone(),
            calibration: LinearCalibration::VACUUM_SENSOR,
            state: ControllerState::new(config.minimum_vacuum, config.maximum_vacuum),
            sequencer: Sequencer::new(config.inter_actuator_delay_ms),
            poller: PollScheduler::new(config.poll_interval_ms),
            last_sample: None,
        }
    }

    /// Zone index used to route continuations
    pub fn index(&self) -> u8 {
        self.index
    }

    /// Zone name
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Controller state
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Sequencer for this zone's actuators
    pub fn sequencer(&self) -> &Sequencer {
        &self.sequencer
    }

    /// Poll tick: evaluate the controller and re-arm `timer`
    pub fn poll<S, T>(&mut self, now_ms: u64, motion: &mut S, timer: &mut T)
    where
        S: MotionScheduler,
        T: Timer,
    {
        let next_ms = self.poller.tick(now_ms, self.index, &mut self.state, motion);
        timer.reschedule(next_ms);
    }

    /// Enable automatic control
    ///
    /// Does not actuate; the next poll tick decides.
    pub fn enable(&mut self) {
        self.state.set_activated(true);
        info!("Vacuum {} enabled", self.index);
    }

    /// Disable automatic control and power off unconditionally
    ///
    /// Control stays disabled even if the power-off is rejected; the
    /// caller retries once `motion` has room.
    pub fn disable<S: MotionScheduler>(&mut self, motion: &mut S) -> Result<(), ScheduleError> {
        self.state.set_activated(false);
        self.schedule(SequenceKind::PowerOff, motion)?;
        info!("Vacuum {} disabled", self.index);
        Ok(())
    }

    /// Disable automatic control, stop the pump and vent the tank
    pub fn empty_tank<S: MotionScheduler>(&mut self, motion: &mut S) -> Result<(), ScheduleError> {
        self.state.set_activated(false);
        self.schedule(SequenceKind::EmptyTank, motion)?;
        info!("Vacuum {} emptying tank", self.index);
        Ok(())
    }

    /// Dispatch a named operator command
    pub fn handle<S: MotionScheduler>(
        &mut self,
        command: Command,
        motion: &mut S,
    ) -> Result<(), ScheduleError> {
        match command {
            Command::EnableVacuum => {
                self.enable();
                Ok(())
            }
            Command::DisableVacuum => self.disable(motion),
            Command::EmptyVacuumTank => self.empty_tank(motion),
        }
    }

    fn schedule<S: MotionScheduler>(
        &self,
        sequence: SequenceKind,
        motion: &mut S,
    ) -> Result<(), ScheduleError> {
        motion
            .run_after_queue_settles(Continuation::new(self.index, sequence))
            .map_err(|e| {
                warn!("Vacuum {}: {} not scheduled: {}", self.index, sequence, e);
                e
            })
    }

    /// Timed writes for a resolved continuation starting at `when_ms`
    ///
    /// Returns `None` if the continuation belongs to another zone.
    pub fn writes_for(&self, continuation: Continuation, when_ms: u64) -> Option<[PinWrite; 2]> {
        if continuation.zone != self.index {
            warn!(
                "Zone {} ignoring continuation for zone {}",
                self.index, continuation.zone
            );
            return None;
        }

        debug!(
            "Vacuum {}: {} at {}",
            self.index, continuation.sequence, when_ms
        );
        Some(self.sequencer.sequence(continuation.sequence, when_ms))
    }

    /// Execute a resolved continuation at `when_ms`
    ///
    /// Returns `false` if the continuation belongs to another zone.
    pub fn run_continuation<M, V>(
        &self,
        continuation: Continuation,
        when_ms: u64,
        motor: &mut M,
        valve: &mut V,
    ) -> bool
    where
        M: DigitalOutput,
        V: DigitalOutput,
    {
        let Some(writes) = self.writes_for(continuation, when_ms) else {
            return false;
        };
        for write in writes {
            write.send_to(motor, valve);
        }
        true
    }

    /// Status snapshot
    pub fn status(&self) -> ZoneStatus {
        ZoneStatus {
            pressure: self.state.raw_pressure(),
            absolute_pressure: self.state.absolute_pressure(),
            activated: self.state.is_activated(),
            running: self.state.is_running(),
            raw_sample: self.last_sample.map(|(_, value)| value),
            sampled_at_ms: self.last_sample.map(|(at_ms, _)| at_ms),
        }
    }
}

impl SampleSink for VacuumZone {
    /// Store a calibrated reading; never actuates
    fn on_sample(&mut self, read_time_ms: u64, value: f32) {
        let pressure = self.calibration.apply(value);
        self.state.update_pressure(pressure);
        self.last_sample = Some((read_time_ms, value));
        trace!("Vacuum {} pressure {}", self.index, pressure);
    }
}
