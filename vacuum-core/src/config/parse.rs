//! Minimal TOML parser for vacuum configuration
//!
//! Handles only the subset `vacuum.toml` needs and allocates nothing, so
//! it runs on the firmware target and on the host alike. It does NOT
//! support the full TOML spec.
//!
//! Supported:
//! - Key = value pairs (string, number, boolean)
//! - `[console]`, `[vacuum.<name>]` and `[vacuum <name>]` headers
//! - Comments (# ...)
//!
//! Durations are written in seconds and stored in milliseconds.

use heapless::String;

use super::hardware::{MachineConfig, PinConfig};
use super::types::{VacuumConfig, MAX_LABEL_LEN};

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid section header
    InvalidSection,
    /// Invalid value type
    InvalidValue,
    /// Too many zones
    TooManyItems,
    /// Invalid pin string
    InvalidPin,
}

/// Current parsing context
#[derive(Debug, Clone, PartialEq)]
enum Section {
    Root,
    Console,
    Vacuum(String<MAX_LABEL_LEN>),
}

/// Parse TOML configuration into a [`MachineConfig`]
///
/// Unknown keys are ignored. The result is not validated; call
/// [`MachineConfig::validate`] afterwards.
pub fn parse_config(input: &str) -> Result<MachineConfig, ParseError> {
    let mut config = MachineConfig::new();
    let mut section = Section::Root;
    let mut current: Option<VacuumConfig> = None;

    for line in input.lines() {
        let line = line.trim();

        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            save_zone(&mut config, &mut current)?;
            section = parse_section_header(&line[1..line.len() - 1])?;
            if let Section::Vacuum(name) = &section {
                current = Some(VacuumConfig {
                    name: name.clone(),
                    ..Default::default()
                });
            }
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(&section, key, value, &mut config, &mut current)?;
        }
    }

    save_zone(&mut config, &mut current)?;
    Ok(config)
}

/// Parse a section header like "vacuum.bed", "vacuum bed" or "console"
fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    let header = header.trim();

    if header == "console" {
        return Ok(Section::Console);
    }

    let name = header
        .strip_prefix("vacuum.")
        .or_else(|| header.strip_prefix("vacuum "))
        .map(str::trim)
        .ok_or(ParseError::InvalidSection)?;

    if name.is_empty() || name.contains(['.', ' ']) {
        return Err(ParseError::InvalidSection);
    }
    let name = String::try_from(name).map_err(|_| ParseError::InvalidSection)?;
    Ok(Section::Vacuum(name))
}

/// Parse "key = value" line
fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

/// Parse a string value (removes quotes)
fn parse_string(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Parse an integer value
fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

/// Parse a finite number
fn parse_float(value: &str) -> Result<f32, ParseError> {
    let v: f32 = value.parse().map_err(|_| ParseError::InvalidValue)?;
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ParseError::InvalidValue)
    }
}

/// Parse a boolean, also accepting 0 and 1
fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" | "1" | "1.0" => Ok(true),
        "false" | "0" | "0.0" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

/// Parse a duration in seconds into milliseconds
fn parse_seconds(value: &str) -> Result<u32, ParseError> {
    let seconds = parse_float(value)?;
    if seconds < 0.0 {
        return Err(ParseError::InvalidValue);
    }
    let ms = seconds * 1000.0 + 0.5;
    if ms >= u32::MAX as f32 {
        return Err(ParseError::InvalidValue);
    }
    Ok(ms as u32)
}

/// Parse a pin string like "gpio21" or "!gpio21"
fn parse_pin(value: &str) -> Result<PinConfig, ParseError> {
    let value = parse_string(value);
    let (inverted, s) = match value.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, value),
    };

    let pin: u8 = s
        .strip_prefix("gpio")
        .ok_or(ParseError::InvalidPin)?
        .parse()
        .map_err(|_| ParseError::InvalidPin)?;
    if pin > 29 {
        return Err(ParseError::InvalidPin);
    }

    Ok(PinConfig { pin, inverted })
}

/// Apply a parsed value to the appropriate config field
fn apply_value(
    section: &Section,
    key: &str,
    value: &str,
    config: &mut MachineConfig,
    current: &mut Option<VacuumConfig>,
) -> Result<(), ParseError> {
    match section {
        Section::Root => {
            if key == "version" {
                config.version = parse_int(value)?;
            }
        }
        Section::Console => match key {
            "uart_tx_pin" | "tx_pin" => config.console.uart_tx_pin = parse_pin(value)?.pin,
            "uart_rx_pin" | "rx_pin" => config.console.uart_rx_pin = parse_pin(value)?.pin,
            "baud_rate" | "baud" => config.console.baud_rate = parse_int(value)?,
            _ => {}
        },
        Section::Vacuum(_) => {
            let z = current.as_mut().ok_or(ParseError::InvalidSection)?;
            match key {
                "vacuum_pump_pin" => z.pump_pin = parse_pin(value)?,
                "valve_pin" => z.valve_pin = parse_pin(value)?,
                "sensor_pin" => z.sensor_pin = parse_pin(value)?.pin,
                "minimum_vac" => z.minimum_vacuum = parse_float(value)?,
                "maximum_vac" => z.maximum_vacuum = parse_float(value)?,
                "maximum_mcu_duration" => z.max_duration_ms = parse_seconds(value)?,
                "value" => z.start_value = parse_bool(value)?,
                "shutdown_value" => z.shutdown_value = parse_bool(value)?,
                "inter_actuator_delay" => z.inter_actuator_delay_ms = parse_seconds(value)?,
                "poll_interval" => z.poll_interval_ms = parse_seconds(value)?,
                "sample_count" => z.sampling.sample_count = parse_int(value)?,
                "report_time" => z.sampling.report_time_ms = parse_seconds(value)?,
                _ => {} // Ignore unknown keys
            }
        }
    }
    Ok(())
}

/// Push the zone being built, if any
fn save_zone(
    config: &mut MachineConfig,
    current: &mut Option<VacuumConfig>,
) -> Result<(), ParseError> {
    if let Some(zone) = current.take() {
        config
            .zones
            .push(zone)
            .map_err(|_| ParseError::TooManyItems)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    const SAMPLE: &str = r#"
# Vacuum controller
version = 2

[console]
baud_rate = 57600

[vacuum.bed]
vacuum_pump_pin = "gpio21"
valve_pin = "!gpio22"
sensor_pin = "gpio26"
minimum_vac = 5.0
maximum_vac = 20   # integers are fine
maximum_mcu_duration = 2.0
value = false
shutdown_value = 0
inter_actuator_delay = 1.0
poll_interval = 1.25
mystery_key = 42
"#;

    #[test]
    fn test_parse_sample() {
        let config = parse_config(SAMPLE).unwrap();
        assert_eq!(config.version, 2);
        assert_eq!(config.console.baud_rate, 57_600);
        assert_eq!(config.zones.len(), 1);

        let zone = &config.zones[0];
        assert_eq!(zone.name.as_str(), "bed");
        assert_eq!(zone.pump_pin, PinConfig::new(21));
        assert_eq!(zone.valve_pin, PinConfig::inverted(22));
        assert_eq!(zone.sensor_pin, 26);
        assert_eq!(zone.minimum_vacuum, 5.0);
        assert_eq!(zone.maximum_vacuum, 20.0);
        assert_eq!(zone.max_duration_ms, 2000);
        assert!(!zone.start_value);
        assert!(!zone.shutdown_value);
        assert_eq!(zone.inter_actuator_delay_ms, 1000);
        assert_eq!(zone.poll_interval_ms, 1250);

        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_parse_pin() {
        let pin = parse_pin("gpio11").unwrap();
        assert_eq!(pin.pin, 11);
        assert!(!pin.inverted);

        let pin = parse_pin("\"!gpio12\"").unwrap();
        assert_eq!(pin.pin, 12);
        assert!(pin.inverted);

        assert_eq!(parse_pin("pb3"), Err(ParseError::InvalidPin));
        assert_eq!(parse_pin("gpio30"), Err(ParseError::InvalidPin));
    }

    #[test]
    fn test_parse_section_header() {
        assert_eq!(parse_section_header("console"), Ok(Section::Console));

        match parse_section_header("vacuum.bed").unwrap() {
            Section::Vacuum(name) => assert_eq!(name.as_str(), "bed"),
            _ => panic!("Wrong section type"),
        }

        match parse_section_header("vacuum  table").unwrap() {
            Section::Vacuum(name) => assert_eq!(name.as_str(), "table"),
            _ => panic!("Wrong section type"),
        }

        assert_eq!(
            parse_section_header("fan exhaust"),
            Err(ParseError::InvalidSection)
        );
        assert_eq!(
            parse_section_header("vacuum.a.b"),
            Err(ParseError::InvalidSection)
        );
    }

    #[test]
    fn test_parse_seconds() {
        assert_eq!(parse_seconds("0"), Ok(0));
        assert_eq!(parse_seconds("0.5"), Ok(500));
        assert_eq!(parse_seconds("1.25"), Ok(1250));
        assert_eq!(parse_seconds("-1"), Err(ParseError::InvalidValue));
        assert_eq!(parse_seconds("soon"), Err(ParseError::InvalidValue));
    }

    #[test]
    fn test_defaults_for_missing_keys() {
        let config = parse_config("[vacuum.bed]\nminimum_vac = 1\nmaximum_vac = 2\n").unwrap();
        let zone = &config.zones[0];
        assert_eq!(zone.max_duration_ms, 0);
        assert_eq!(zone.inter_actuator_delay_ms, 1000);
        assert_eq!(zone.poll_interval_ms, 1250);
    }

    #[test]
    fn test_multiple_zones_keep_order() {
        let input = "[vacuum.left]\nminimum_vac = 1\n[vacuum.right]\nminimum_vac = 2\n";
        let config = parse_config(input).unwrap();
        assert_eq!(config.zones.len(), 2);
        assert_eq!(config.zones[0].name.as_str(), "left");
        assert_eq!(config.zones[1].name.as_str(), "right");
    }

    #[test]
    fn test_too_many_zones() {
        let input = "[vacuum.a]\n[vacuum.b]\n[vacuum.c]\n[vacuum.d]\n[vacuum.e]\n";
        assert_eq!(parse_config(input).unwrap_err(), ParseError::TooManyItems);
    }

    #[test]
    fn test_bad_value_rejected() {
        let input = "[vacuum.bed]\nminimum_vac = lots\n";
        assert_eq!(parse_config(input).unwrap_err(), ParseError::InvalidValue);
    }

    #[test]
    fn test_inverted_band_parses_but_fails_validation() {
        let input = "[vacuum.bed]\nminimum_vac = 25\nmaximum_vac = 5\n";
        let config = parse_config(input).unwrap();
        assert_eq!(config.validate(), Err(ConfigError::InvertedBand));
    }
}
