//! Vacuum - Vacuum Zone Controller Firmware
//!
//! Main firmware binary for RP2040-based vacuum controllers. Regulates one
//! vacuum zone with a pump motor, a release valve and an analog pressure
//! sensor, driven from an embedded TOML configuration.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, BufferedUart, Config as UartConfig};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use vacuum_core::config::{MachineConfig, PinConfig, VacuumConfig};
use vacuum_drivers::output::TimedOutput;

use crate::config::load_config;

mod channels;
mod config;
mod tasks;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Board wiring (SKR Pico: HE0 = GPIO21, HE1 = GPIO22, TH0 = GPIO26)
const BOARD_PUMP_PIN: u8 = 21;
const BOARD_VALVE_PIN: u8 = 22;
const BOARD_SENSOR_PIN: u8 = 26;

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Vacuum firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let machine = load_config();
    let zone = primary_zone(&machine);
    check_board_pins(&zone);

    // Console UART
    let mut uart_config = UartConfig::default();
    uart_config.baudrate = machine.console.baud_rate;

    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);

    let uart = BufferedUart::new(p.UART0, p.PIN_0, p.PIN_1, Irqs, tx_buf, rx_buf, uart_config);
    let (tx, rx) = uart.split();

    info!("UART initialized for console");

    // Pressure sensor
    // Pin assignment is board-specific (SKR Pico TH0: GPIO26)
    let adc = Adc::new(p.ADC, Irqs, embassy_rp::adc::Config::default());
    let sensor_channel = Channel::new_pin(p.PIN_26, Pull::None);

    // Pump motor and release valve
    // Pin assignments are board-specific (SKR Pico HE0: GPIO21, HE1: GPIO22)
    let setup = zone.actuator_setup();
    let motor: tasks::VacuumOutput = unwrap!(TimedOutput::new(
        Output::new(p.PIN_21, idle_level(&zone.pump_pin, setup.start_value)),
        zone.pump_pin.inverted,
        setup,
    ));
    let valve: tasks::VacuumOutput = unwrap!(TimedOutput::new(
        Output::new(p.PIN_22, idle_level(&zone.valve_pin, setup.start_value)),
        zone.valve_pin.inverted,
        setup,
    ));

    info!("ADC and outputs initialized");

    unwrap!(spawner.spawn(tasks::actuator_task(motor, valve)));
    unwrap!(spawner.spawn(tasks::sensor_task(adc, sensor_channel, zone.sampling)));
    unwrap!(spawner.spawn(tasks::console_task(rx, tx)));
    unwrap!(spawner.spawn(tasks::controller_task(zone)));

    info!("All tasks spawned, firmware running");

    loop {
        embassy_time::Timer::after_secs(60).await;
        trace!("Main loop heartbeat");
    }
}

/// Electrical level matching an output's start value
fn idle_level(pin: &PinConfig, start_value: bool) -> Level {
    Level::from(pin.level(start_value))
}

/// First configured zone
///
/// This board wires a single zone; extra zones are reported and ignored.
fn primary_zone(machine: &MachineConfig) -> VacuumConfig {
    if machine.zones.len() > 1 {
        warn!(
            "{} vacuum zones configured, this board drives only the first",
            machine.zones.len()
        );
    }
    match machine.zones.first() {
        Some(zone) => zone.clone(),
        None => {
            warn!("No vacuum zone configured, using fallback zone");
            config::fallback_zone()
        }
    }
}

/// Warn if the configured pins disagree with the board wiring
fn check_board_pins(zone: &VacuumConfig) {
    if zone.pump_pin.pin != BOARD_PUMP_PIN {
        warn!(
            "vacuum_pump_pin gpio{} ignored, board uses gpio{}",
            zone.pump_pin.pin, BOARD_PUMP_PIN
        );
    }
    if zone.valve_pin.pin != BOARD_VALVE_PIN {
        warn!(
            "valve_pin gpio{} ignored, board uses gpio{}",
            zone.valve_pin.pin, BOARD_VALVE_PIN
        );
    }
    if zone.sensor_pin != BOARD_SENSOR_PIN {
        warn!(
            "sensor_pin gpio{} ignored, board uses gpio{}",
            zone.sensor_pin, BOARD_SENSOR_PIN
        );
    }
}
