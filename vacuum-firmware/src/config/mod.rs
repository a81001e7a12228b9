//! Configuration loading
//!
//! The configuration is compiled into the firmware from `vacuum.toml`
//! (validated by build.rs) and parsed at startup with the alloc-free
//! parser in `vacuum-core`. If parsing or validation fails a single
//! conservative fallback zone is used instead.

use defmt::*;
use heapless::String;

use vacuum_core::config::{parse_config, MachineConfig, PinConfig, VacuumConfig};

/// Embedded configuration (compiled into firmware)
/// Edit vacuum.toml and rebuild to customize
const EMBEDDED_CONFIG: &str = include_str!("../../vacuum.toml");

/// Parse and validate the embedded configuration
pub fn load_config() -> MachineConfig {
    let config = match parse_config(EMBEDDED_CONFIG) {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to parse embedded config: {:?}", e);
            return fallback_config();
        }
    };

    match config.validate() {
        Ok(()) => {
            info!("Loaded {} vacuum zone(s)", config.zones.len());
            config
        }
        Err(e) => {
            error!("Invalid vacuum config: {:?}", e);
            fallback_config()
        }
    }
}

/// Machine configuration holding only the fallback zone
fn fallback_config() -> MachineConfig {
    error!("Using fallback configuration");
    let mut config = MachineConfig::new();
    // Cannot fail: the zone list starts empty
    let _ = config.zones.push(fallback_zone());
    config
}

/// Zone that never runs the pump unattended
///
/// Thresholds of zero keep the pump off while enabled, and every output
/// falls back to off within two seconds of a stalled controller.
pub fn fallback_zone() -> VacuumConfig {
    let mut name: String<16> = String::new();
    let _ = name.push_str("fallback");
    VacuumConfig {
        name,
        pump_pin: PinConfig::new(21),
        valve_pin: PinConfig::new(22),
        sensor_pin: 26,
        max_duration_ms: 2000,
        ..Default::default()
    }
}
