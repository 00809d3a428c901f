//! Build script for pubremote-firmware
//!
//! - Passes the esp-hal and defmt linker scripts to the linker
//! - Validates remote.toml at compile time and generates the tuning constants

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use pubremote_core::config::{clip_chars, LinkConfig};
use pubremote_core::stick::AxisCalibration;
use serde::Deserialize;

/// Top level of remote.toml
#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct RemoteToml {
    link: LinkConfig,
    stick: StickToml,
}

#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct StickToml {
    x: AxisCalibration,
    y: AxisCalibration,
}

fn main() {
    setup_linker();
    let config = load_config();
    generate_config(&config);
}

/// Link against the esp-hal memory layout and the defmt symbol table
fn setup_linker() {
    println!("cargo:rustc-link-arg=-Tlinkall.x");
    println!("cargo:rustc-link-arg=-Tdefmt.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read and validate remote.toml
fn load_config() -> RemoteToml {
    println!("cargo:rerun-if-changed=remote.toml");

    let config_path = Path::new("remote.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: remote.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a remote.toml configuration file.         ║\n\
            ║  Please create one in the pubremote-firmware directory.          ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read remote.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: RemoteToml = match toml::from_str(&config_content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid remote.toml                                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let mut errors = Vec::new();
    if let Err(e) = config.link.validate() {
        errors.push(format!("[link] {:?}", e));
    }
    if let Err(e) = config.stick.x.validate() {
        errors.push(format!("[stick.x] {:?}", e));
    }
    if let Err(e) = config.stick.y.validate() {
        errors.push(format!("[stick.y] {:?}", e));
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid values in remote.toml                            ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=remote.toml validated successfully");
    config
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", clip_chars(line, 61))
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write the validated values as constants into OUT_DIR/remote_config.rs
fn generate_config(config: &RemoteToml) {
    let link = &config.link;
    let source = format!(
        "/// Link timings from remote.toml\n\
         pub const LINK_CONFIG: LinkConfig = LinkConfig {{\n\
         \x20   monitor_tick_ms: {},\n\
         \x20   transmit_tick_ms: {},\n\
         \x20   command_timeout_ms: {},\n\
         \x20   reconnect_grace_ms: {},\n\
         \x20   give_up_timeout_ms: {},\n\
         \x20   handshake_timeout_ms: {},\n\
         \x20   channel_hop_interval_ms: {},\n\
         }};\n\n\
         /// Steering axis calibration from remote.toml\n\
         pub const STICK_X: AxisCalibration = {};\n\n\
         /// Throttle axis calibration from remote.toml\n\
         pub const STICK_Y: AxisCalibration = {};\n",
        link.monitor_tick_ms,
        link.transmit_tick_ms,
        link.command_timeout_ms,
        link.reconnect_grace_ms,
        link.give_up_timeout_ms,
        link.handshake_timeout_ms,
        link.channel_hop_interval_ms,
        calibration_literal(&config.stick.x),
        calibration_literal(&config.stick.y),
    );

    let out_dir = PathBuf::from(env::var("OUT_DIR").expect("OUT_DIR is set by cargo"));
    if let Err(e) = fs::write(out_dir.join("remote_config.rs"), source) {
        panic!("failed to write remote_config.rs: {}", e);
    }
}

fn calibration_literal(cal: &AxisCalibration) -> String {
    format!(
        "AxisCalibration {{ min: {}, center: {}, max: {}, deadband: {}, invert: {} }}",
        cal.min, cal.center, cal.max, cal.deadband, cal.invert
    )
}
