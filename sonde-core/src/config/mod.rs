//! Configuration
//!
//! `sonde.toml` is embedded in the firmware and parsed at boot by a
//! minimal `no_std` parser. Raw values are validated into runtime types
//! separately so a bad value can be reported with its key.

pub mod parse;
pub mod types;

pub use parse::{parse_config, ParseError, ParseErrorKind};
pub use types::{ConfigError, DebugSection, ReceiverSection, SondeConfig};
