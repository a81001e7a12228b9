//! Build script for vacuum-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates vacuum.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Keys every `[vacuum.<name>]` table must carry
const REQUIRED_KEYS: &[&str] = &[
    "vacuum_pump_pin",
    "valve_pin",
    "sensor_pin",
    "minimum_vac",
    "maximum_vac",
];

fn main() {
    setup_linker();
    validate_config();
}

/// Arguments for cortex-m-rt, the RP2040 boot section and defmt
const LINK_ARGS: &[&str] = &["--nmagic", "-Tlink.x", "-Tlink-rp.x", "-Tdefmt.x"];

/// Put memory.x on the linker search path
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    File::create(out_dir.join("memory.x"))
        .and_then(|mut f| f.write_all(include_bytes!("memory.x")))
        .unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    for arg in LINK_ARGS {
        println!("cargo:rustc-link-arg-bins={}", arg);
    }

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Minimal zone shown when vacuum.toml is missing
const EXAMPLE_ZONE: &[&str] = &[
    "[vacuum.bed]",
    "vacuum_pump_pin = \"gpio21\"",
    "valve_pin = \"gpio22\"",
    "sensor_pin = \"gpio26\"",
    "minimum_vac = 5.0",
    "maximum_vac = 20.0",
];

/// Validate vacuum.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=vacuum.toml");

    let content = match fs::read_to_string(Path::new("vacuum.toml")) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            let mut lines = vec![
                "vacuum-firmware/vacuum.toml describes the zone this board".to_string(),
                "drives. Create it with at least one [vacuum.<name>] table:".to_string(),
                String::new(),
            ];
            lines.extend(EXAMPLE_ZONE.iter().map(|line| format!("    {}", line)));
            fail("vacuum.toml not found", &lines);
        }
        Err(e) => fail("Failed to read vacuum.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => {
            let lines: Vec<String> = e.to_string().lines().map(str::to_string).collect();
            fail("Invalid TOML syntax in vacuum.toml", &lines);
        }
    };

    validate_required_sections(&config);
    validate_zones(&config);

    println!("cargo:warning=vacuum.toml validated successfully");
}

/// Width of the text inside an error box
const BOX_WIDTH: usize = 64;

/// Abort the build with `lines` framed under `title`
fn fail(title: &str, lines: &[String]) -> ! {
    let rule = "═".repeat(BOX_WIDTH + 4);
    let mut out = format!("\n╔{rule}╗\n║  ERROR: {:<width$}  ║\n╠{rule}╣\n", title, width = BOX_WIDTH - 7);
    for line in lines {
        let line = if line.chars().count() > BOX_WIDTH {
            let cut: String = line.chars().take(BOX_WIDTH - 3).collect();
            format!("{}...", cut)
        } else {
            line.clone()
        };
        out.push_str(&format!("║  {:<width$}  ║\n", line, width = BOX_WIDTH));
    }
    out.push_str(&format!("╚{rule}╝\n"));
    panic!("{}", out);
}

/// Abort the build if any errors were collected
fn report(title: &str, errors: &[String]) {
    if errors.is_empty() {
        return;
    }
    let bullets: Vec<String> = errors.iter().map(|e| format!("• {}", e)).collect();
    fail(title, &bullets);
}

/// Validate that at least one zone exists
fn validate_required_sections(config: &toml::Value) {
    let mut errors = Vec::new();

    match config.get("vacuum") {
        Some(toml::Value::Table(zones)) if !zones.is_empty() => {}
        Some(_) => errors.push("[vacuum.*] must contain at least one zone".to_string()),
        None => errors.push("Missing [vacuum.*] section - at least one zone is required".to_string()),
    }

    report("Missing required sections in vacuum.toml", &errors);
}

/// Read a number that may be written as an integer or a float
fn as_number(value: &toml::Value) -> Option<f64> {
    match value {
        toml::Value::Float(f) => Some(*f),
        toml::Value::Integer(i) => Some(*i as f64),
        _ => None,
    }
}

/// Check a pin string like "gpio21" or "!gpio21"
fn is_valid_pin(value: &str) -> bool {
    let value = value.strip_prefix('!').unwrap_or(value);
    value
        .strip_prefix("gpio")
        .and_then(|n| n.parse::<u8>().ok())
        .is_some_and(|n| n <= 29)
}

/// Validate zone configurations
fn validate_zones(config: &toml::Value) {
    let zones = match config.get("vacuum") {
        Some(toml::Value::Table(t)) => t,
        _ => return,
    };

    let mut errors = Vec::new();

    if zones.len() > 4 {
        errors.push("at most 4 [vacuum.*] zones are supported".to_string());
    }

    for (name, zone) in zones {
        let zone = match zone {
            toml::Value::Table(t) => t,
            _ => {
                errors.push(format!("[vacuum.{}] must be a table", name));
                continue;
            }
        };

        if name.len() > 16 {
            errors.push(format!("[vacuum.{}] name longer than 16 characters", name));
        }

        for key in REQUIRED_KEYS {
            if zone.get(*key).is_none() {
                errors.push(format!("[vacuum.{}] missing '{}'", name, key));
            }
        }

        for key in ["vacuum_pump_pin", "valve_pin", "sensor_pin"] {
            match zone.get(key) {
                Some(toml::Value::String(pin)) if is_valid_pin(pin) => {}
                Some(_) => errors.push(format!("[vacuum.{}] {} must be \"gpioN\"", name, key)),
                None => {}
            }
        }

        let min = zone.get("minimum_vac").and_then(as_number);
        let max = zone.get("maximum_vac").and_then(as_number);
        if let (Some(min), Some(max)) = (min, max) {
            if min > max {
                errors.push(format!("[vacuum.{}] minimum_vac above maximum_vac", name));
            }
        }

        if let Some(duration) = zone.get("maximum_mcu_duration").and_then(as_number) {
            if duration != 0.0 && !(0.5..=5.0).contains(&duration) {
                errors.push(format!(
                    "[vacuum.{}] maximum_mcu_duration must be 0 or 0.5-5.0",
                    name
                ));
            }
        }

        for key in ["inter_actuator_delay", "poll_interval"] {
            if let Some(value) = zone.get(key).and_then(as_number) {
                if value <= 0.0 {
                    errors.push(format!("[vacuum.{}] {} must be positive", name, key));
                }
            }
        }
    }

    report("Invalid vacuum configuration", &errors);
}
