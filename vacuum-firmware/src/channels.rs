//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use vacuum_core::{Command, PinWrite, ZoneStatus};

/// Channel capacity for console commands
const COMMAND_CHANNEL_SIZE: usize = 4;

/// Channel capacity for pin writes (one sequence is two writes)
///
/// The controller waits for room, so this only bounds how far it runs ahead.
const PIN_WRITE_CHANNEL_SIZE: usize = 8;

/// Operator commands from the console
pub static COMMAND_CHANNEL: Channel<CriticalSectionRawMutex, Command, COMMAND_CHANNEL_SIZE> =
    Channel::new();

/// Timed pin writes from the controller to the actuator task
pub static PIN_WRITES: Channel<CriticalSectionRawMutex, PinWrite, PIN_WRITE_CHANNEL_SIZE> =
    Channel::new();

/// Latest pressure report: (read time in ms, normalized 0.0-1.0)
pub static PRESSURE_SAMPLE: Signal<CriticalSectionRawMutex, (u64, f32)> = Signal::new();

/// Poll heartbeat from the controller (time in ms)
///
/// The actuator task treats it as the output refresh.
pub static HEARTBEAT: Signal<CriticalSectionRawMutex, u64> = Signal::new();

/// Latest zone status, `None` until the controller starts
pub static ZONE_STATUS: Mutex<CriticalSectionRawMutex, Cell<Option<ZoneStatus>>> =
    Mutex::new(Cell::new(None));

/// Read the latest zone status
pub fn zone_status() -> Option<ZoneStatus> {
    ZONE_STATUS.lock(|status| status.get())
}

/// Publish a zone status snapshot
pub fn publish_status(status: ZoneStatus) {
    ZONE_STATUS.lock(|cell| cell.set(Some(status)));
}
