//! Configuration loading
//!
//! `sonde.toml` is validated by the build script, so failures here mean
//! the embedded text and the parser disagree. Defaults keep the receiver
//! running either way.

use defmt::*;

use sonde_core::config::{parse_config, ReceiverSection, SondeConfig};
use sonde_core::rx::RxConfig;

/// Parse and validate the embedded configuration
///
/// A rejected `[receiver]` section is replaced by its defaults so the
/// returned pair always agrees.
pub fn load_config(input: &str) -> (SondeConfig, RxConfig) {
    let config = match parse_config(input) {
        Ok(config) => config,
        Err(e) => {
            error!("sonde.toml line {}: {:?}, using defaults", e.line, e.kind);
            SondeConfig::default()
        }
    };

    match config.rx_config() {
        Ok(rx_config) => (config, rx_config),
        Err(e) => {
            error!("Invalid receiver config: {:?}, using defaults", e);
            let config = SondeConfig {
                receiver: ReceiverSection::default(),
                ..config
            };
            (config, RxConfig::default())
        }
    }
}
