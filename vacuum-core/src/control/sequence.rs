//! Actuation sequencing
//!
//! Every control action is a pair of timed writes to the motor and the
//! valve, separated by a fixed inter-actuator delay. The order matters:
//!
//! | action     | first write          | second write (t + delay) |
//! |------------|----------------------|--------------------------|
//! | power on   | motor on             | valve on                 |
//! | power off  | valve off            | motor off                |
//! | empty tank | motor off            | valve on                 |
//!
//! Suction builds before the line is exposed, the line closes before
//! the pump stops, and an emptied tank vents only once the pump is cut.

use super::hysteresis::Decision;
use crate::traits::{Actuator, DigitalOutput};

/// Action implemented by one sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequenceKind {
    PowerOn,
    PowerOff,
    /// Operator-forced release, independent of automatic control
    EmptyTank,
}

impl From<Decision> for SequenceKind {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::PowerOn => SequenceKind::PowerOn,
            Decision::PowerOff => SequenceKind::PowerOff,
        }
    }
}

/// One timed write to an actuator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinWrite {
    pub target: Actuator,
    pub value: bool,
    pub at_ms: u64,
}

impl PinWrite {
    const fn new(target: Actuator, value: bool, at_ms: u64) -> Self {
        Self {
            target,
            value,
            at_ms,
        }
    }

    /// Hand this write to the output it targets
    pub fn send_to<M, V>(self, motor: &mut M, valve: &mut V)
    where
        M: DigitalOutput,
        V: DigitalOutput,
    {
        match self.target {
            Actuator::Motor => motor.set_digital(self.at_ms, self.value),
            Actuator::Valve => valve.set_digital(self.at_ms, self.value),
        }
    }
}

/// Builds and applies actuation sequences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Sequencer {
    inter_actuator_delay_ms: u32,
}

impl Sequencer {
    /// Create a sequencer with the given motor/valve spacing
    pub const fn new(inter_actuator_delay_ms: u32) -> Self {
        Self {
            inter_actuator_delay_ms,
        }
    }

    /// Delay between the two writes of a sequence
    pub fn inter_actuator_delay_ms(&self) -> u32 {
        self.inter_actuator_delay_ms
    }

    /// Ordered writes for `kind` starting at `base_ms`
    ///
    /// `base_ms` must already be a time at which any actuator may safely
    /// be commanded; the sequencer does not adjust it.
    pub fn sequence(&self, kind: SequenceKind, base_ms: u64) -> [PinWrite; 2] {
        let later_ms = self.end_ms(base_ms);
        match kind {
            SequenceKind::PowerOn => [
                PinWrite::new(Actuator::Motor, true, base_ms),
                PinWrite::new(Actuator::Valve, true, later_ms),
            ],
            SequenceKind::PowerOff => [
                PinWrite::new(Actuator::Valve, false, base_ms),
                PinWrite::new(Actuator::Motor, false, later_ms),
            ],
            SequenceKind::EmptyTank => [
                PinWrite::new(Actuator::Motor, false, base_ms),
                PinWrite::new(Actuator::Valve, true, later_ms),
            ],
        }
    }

    /// Time of the last write of a sequence starting at `base_ms`
    pub fn end_ms(&self, base_ms: u64) -> u64 {
        base_ms.saturating_add(u64::from(self.inter_actuator_delay_ms))
    }

    /// Hand the writes of `kind` to the motor and valve outputs in order
    pub fn apply<M, V>(&self, kind: SequenceKind, base_ms: u64, motor: &mut M, valve: &mut V)
    where
        M: DigitalOutput,
        V: DigitalOutput,
    {
        for write in self.sequence(kind, base_ms) {
            write.send_to(motor, valve);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::vec::Vec;

    #[derive(Default)]
    struct RecordingOutput {
        writes: Vec<(u64, bool)>,
    }

    impl DigitalOutput for RecordingOutput {
        fn set_digital(&mut self, at_ms: u64, value: bool) {
            self.writes.push((at_ms, value));
        }
    }

    #[test]
    fn test_power_on_motor_leads_valve() {
        let sequencer = Sequencer::new(2000);
        assert_eq!(
            sequencer.sequence(SequenceKind::PowerOn, 100_000),
            [
                PinWrite::new(Actuator::Motor, true, 100_000),
                PinWrite::new(Actuator::Valve, true, 102_000),
            ]
        );
    }

    #[test]
    fn test_power_off_valve_leads_motor() {
        let sequencer = Sequencer::new(2000);
        assert_eq!(
            sequencer.sequence(SequenceKind::PowerOff, 50_000),
            [
                PinWrite::new(Actuator::Valve, false, 50_000),
                PinWrite::new(Actuator::Motor, false, 52_000),
            ]
        );
    }

    #[test]
    fn test_empty_tank_cuts_motor_then_vents() {
        let sequencer = Sequencer::new(1000);
        assert_eq!(
            sequencer.sequence(SequenceKind::EmptyTank, 7_500),
            [
                PinWrite::new(Actuator::Motor, false, 7_500),
                PinWrite::new(Actuator::Valve, true, 8_500),
            ]
        );
    }

    #[test]
    fn test_writes_spaced_by_exact_delay() {
        for delay in [1, 1000, 2000, 12_345] {
            let sequencer = Sequencer::new(delay);
            for kind in [
                SequenceKind::PowerOn,
                SequenceKind::PowerOff,
                SequenceKind::EmptyTank,
            ] {
                let [first, second] = sequencer.sequence(kind, 42);
                assert_eq!(second.at_ms - first.at_ms, u64::from(delay));
                assert_ne!(first.target, second.target);
            }
        }
    }

    #[test]
    fn test_decision_maps_to_sequence() {
        assert_eq!(SequenceKind::from(Decision::PowerOn), SequenceKind::PowerOn);
        assert_eq!(
            SequenceKind::from(Decision::PowerOff),
            SequenceKind::PowerOff
        );
    }

    #[test]
    fn test_apply_routes_writes() {
        let sequencer = Sequencer::new(1000);
        let mut motor = RecordingOutput::default();
        let mut valve = RecordingOutput::default();

        sequencer.apply(SequenceKind::PowerOn, 10, &mut motor, &mut valve);
        sequencer.apply(SequenceKind::PowerOff, 5_000, &mut motor, &mut valve);

        assert_eq!(motor.writes, [(10, true), (6_000, false)]);
        assert_eq!(valve.writes, [(1_010, true), (5_000, false)]);
    }
}
