//! Configuration type definitions

use sonde_hal::uart::StopBits;

use crate::rx::{BaudRate, RxConfig};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Errors validating configuration values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Baud rate has no calibrated timing
    UnsupportedBaud(u32),
    /// Stop bit count other than 1 or 2
    InvalidStopBits(u8),
    /// Idle poll interval not shorter than a half bit
    IdlePollTooLong(u32),
}

/// `[receiver]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReceiverSection {
    /// Line speed in bits per second
    pub baud: u32,
    /// Stop bits per frame
    pub stop_bits: u8,
    /// Check the stop bit for framing errors
    pub check_stop_bit: bool,
    /// Delay between idle samples in microseconds
    pub idle_poll_us: u32,
}

impl Default for ReceiverSection {
    fn default() -> Self {
        Self {
            baud: 9600,
            stop_bits: 1,
            check_stop_bit: true,
            idle_poll_us: 0,
        }
    }
}

/// `[debug]` section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DebugSection {
    /// Report the status line once per receive loop iteration
    pub status_line: bool,
    /// Run the debug relay instead of the bit-banged receiver
    pub relay: bool,
    /// Relay re-arms the receiver and reports listening state
    pub relay_debug: bool,
}

impl Default for DebugSection {
    fn default() -> Self {
        Self {
            status_line: true,
            relay: false,
            relay_debug: true,
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SondeConfig {
    pub receiver: ReceiverSection,
    pub debug: DebugSection,
}

impl SondeConfig {
    /// Validate the receiver section into a runtime configuration
    pub fn rx_config(&self) -> Result<RxConfig, ConfigError> {
        let r = &self.receiver;

        let baud =
            BaudRate::from_bits_per_second(r.baud).ok_or(ConfigError::UnsupportedBaud(r.baud))?;
        let stop_bits =
            StopBits::from_count(r.stop_bits).ok_or(ConfigError::InvalidStopBits(r.stop_bits))?;
        // A start edge found late by more than a half bit pushes every
        // sample into the next bit
        if r.idle_poll_us >= baud.timing().half_bit_us {
            return Err(ConfigError::IdlePollTooLong(r.idle_poll_us));
        }

        Ok(RxConfig {
            timing: baud.timing(),
            stop_bits,
            check_stop_bit: r.check_stop_bit,
            idle_poll_us: r.idle_poll_us,
        })
    }

    /// Check every section
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.rx_config().map(|_| ())
    }
}
