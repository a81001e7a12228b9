//! Hardware configuration types
//!
//! Pin assignments and the top-level machine configuration.

use heapless::Vec;

use super::types::{ConfigError, VacuumConfig};

/// Maximum vacuum zones per config
pub const MAX_ZONES: usize = 4;

/// Pin configuration with optional inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinConfig {
    /// GPIO pin number (0-29 for RP2040)
    pub pin: u8,
    /// Pin is active-low (inverted)
    pub inverted: bool,
}

impl PinConfig {
    /// Create a new pin config
    pub const fn new(pin: u8) -> Self {
        Self {
            pin,
            inverted: false,
        }
    }

    /// Create an inverted (active-low) pin
    pub const fn inverted(pin: u8) -> Self {
        Self {
            pin,
            inverted: true,
        }
    }

    /// Electrical level for a logical value
    pub const fn level(&self, on: bool) -> bool {
        on != self.inverted
    }
}

/// Operator console configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ConsoleHwConfig {
    /// UART TX pin
    pub uart_tx_pin: u8,
    /// UART RX pin
    pub uart_rx_pin: u8,
    /// Baud rate
    pub baud_rate: u32,
}

impl Default for ConsoleHwConfig {
    fn default() -> Self {
        Self {
            uart_tx_pin: 0,
            uart_rx_pin: 1,
            baud_rate: 115_200,
        }
    }
}

/// Complete machine configuration
#[derive(Debug, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MachineConfig {
    /// Configuration version for compatibility checks
    pub version: u8,
    /// Vacuum zones
    pub zones: Vec<VacuumConfig, MAX_ZONES>,
    /// Console configuration
    pub console: ConsoleHwConfig,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            version: 1,
            zones: Vec::new(),
            console: ConsoleHwConfig::default(),
        }
    }
}

impl MachineConfig {
    /// Create a new empty configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate every zone
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.zones.iter().try_for_each(VacuumConfig::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use heapless::String;

    #[test]
    fn test_pin_config() {
        let pin = PinConfig::new(10);
        assert_eq!(pin.pin, 10);
        assert!(!pin.inverted);
        assert!(pin.level(true));

        let inverted = PinConfig::inverted(12);
        assert!(inverted.inverted);
        assert!(!inverted.level(true));
        assert!(inverted.level(false));
    }

    #[test]
    fn test_empty_config() {
        let config = MachineConfig::new();
        assert!(config.zones.is_empty());
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validate_checks_every_zone() {
        let mut config = MachineConfig::new();
        let mut name: String<16> = String::new();
        name.push_str("bed").unwrap();
        config
            .zones
            .push(VacuumConfig {
                name,
                minimum_vacuum: 20.0,
                maximum_vacuum: 5.0,
                ..Default::default()
            })
            .unwrap();

        assert_eq!(config.validate(), Err(ConfigError::InvertedBand));
    }
}
