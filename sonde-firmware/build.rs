//! Build script for sonde-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates sonde.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use sonde_core::config::{parse_config, ConfigError, ParseErrorKind};

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate sonde.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=sonde.toml");

    let config_path = Path::new("sonde.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: sonde.toml not found!                                    ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds its configuration at build time.            ║\n\
            ║  Please create sonde.toml in the sonde-firmware directory.       ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read sonde.toml                                ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    if let Err(e) = toml::from_str::<toml::Value>(&config_content) {
        let error_msg = e.to_string();
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid TOML syntax in sonde.toml                        ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&error_msg)
        );
    }

    // The firmware parses the same text at boot; anything it would reject
    // must fail here instead of silently falling back to defaults
    if let Err(error_msg) = validate_with_firmware_parser(&config_content) {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in sonde.toml                      ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            format_error_lines(&error_msg)
        );
    }

    println!("cargo:warning=sonde.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Run the firmware's own parser and validation over the config
fn validate_with_firmware_parser(content: &str) -> Result<(), String> {
    let config = parse_config(content).map_err(|e| {
        let what = match e.kind {
            ParseErrorKind::InvalidSection => "malformed [section] header",
            ParseErrorKind::UnknownSection => "unknown section",
            ParseErrorKind::UnknownKey => "unknown key",
            ParseErrorKind::InvalidValue => "value must be an integer or true/false",
            ParseErrorKind::MissingEquals => "expected `key = value`",
        };
        format!("line {}: {}", e.line, what)
    })?;

    config.validate().map_err(|e| match e {
        ConfigError::UnsupportedBaud(baud) => {
            format!("baud {} has no calibrated delays (4800, 9600)", baud)
        }
        ConfigError::InvalidStopBits(n) => format!("stop_bits {} must be 1 or 2", n),
        ConfigError::IdlePollTooLong(us) => {
            format!("idle_poll_us {} must be shorter than a half bit", us)
        }
    })
}
