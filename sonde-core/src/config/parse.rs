//! `sonde.toml` parser
//!
//! A minimal parser for the subset of TOML the configuration uses. It does
//! NOT support the full TOML spec.
//!
//! Supported:
//! - `[section]` headers
//! - `key = value` pairs with integer or boolean values
//! - Underscores in integers (`9_600`)
//! - Comments (`# ...`), whole-line or trailing
//!
//! Unknown sections and keys are errors, so a typo cannot silently fall
//! back to a default.

use super::types::SondeConfig;

/// What went wrong on a line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseErrorKind {
    /// Malformed `[section]` header
    InvalidSection,
    /// Section name not recognised
    UnknownSection,
    /// Key not recognised in this section
    UnknownKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// Line is neither a header nor `key = value`
    MissingEquals,
}

/// Parse error with its 1-based line number
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParseError {
    pub line: u16,
    pub kind: ParseErrorKind,
}

/// Current parsing context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Receiver,
    Debug,
}

/// Parse TOML text into a [`SondeConfig`]
///
/// Keys that are absent keep their defaults. Values are type-checked here;
/// range checks happen in [`SondeConfig::rx_config`].
pub fn parse_config(input: &str) -> Result<SondeConfig, ParseError> {
    let mut config = SondeConfig::default();
    let mut section = Section::Root;

    for (idx, raw) in input.lines().enumerate() {
        let line_no = u16::try_from(idx + 1).unwrap_or(u16::MAX);
        let err = |kind| ParseError {
            line: line_no,
            kind,
        };

        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        if let Some(header) = line.strip_prefix('[') {
            let name = header
                .strip_suffix(']')
                .ok_or(err(ParseErrorKind::InvalidSection))?;
            section = parse_section_header(name.trim()).map_err(err)?;
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or(err(ParseErrorKind::MissingEquals))?;
        apply_key(&mut config, section, key.trim(), value.trim()).map_err(err)?;
    }

    Ok(config)
}

fn strip_comment(line: &str) -> &str {
    match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    }
}

fn parse_section_header(name: &str) -> Result<Section, ParseErrorKind> {
    match name {
        "" => Err(ParseErrorKind::InvalidSection),
        "receiver" => Ok(Section::Receiver),
        "debug" => Ok(Section::Debug),
        _ => Err(ParseErrorKind::UnknownSection),
    }
}

fn apply_key(
    config: &mut SondeConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseErrorKind> {
    match (section, key) {
        (Section::Receiver, "baud") => config.receiver.baud = parse_u32(value)?,
        (Section::Receiver, "stop_bits") => config.receiver.stop_bits = parse_u8(value)?,
        (Section::Receiver, "check_stop_bit") => config.receiver.check_stop_bit = parse_bool(value)?,
        (Section::Receiver, "idle_poll_us") => config.receiver.idle_poll_us = parse_u32(value)?,
        (Section::Debug, "status_line") => config.debug.status_line = parse_bool(value)?,
        (Section::Debug, "relay") => config.debug.relay = parse_bool(value)?,
        (Section::Debug, "relay_debug") => config.debug.relay_debug = parse_bool(value)?,
        _ => return Err(ParseErrorKind::UnknownKey),
    }
    Ok(())
}

fn parse_u32(value: &str) -> Result<u32, ParseErrorKind> {
    if value.is_empty() || value.starts_with('_') || value.ends_with('_') {
        return Err(ParseErrorKind::InvalidValue);
    }

    let mut result: u32 = 0;
    for c in value.chars() {
        if c == '_' {
            continue;
        }
        let digit = c.to_digit(10).ok_or(ParseErrorKind::InvalidValue)?;
        result = result
            .checked_mul(10)
            .and_then(|r| r.checked_add(digit))
            .ok_or(ParseErrorKind::InvalidValue)?;
    }
    Ok(result)
}

fn parse_u8(value: &str) -> Result<u8, ParseErrorKind> {
    u8::try_from(parse_u32(value)?).map_err(|_| ParseErrorKind::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseErrorKind> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseErrorKind::InvalidValue),
    }
}
