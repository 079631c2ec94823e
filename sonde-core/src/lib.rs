//! Board-agnostic logic for reading a radiosonde data line
//!
//! This crate contains everything that does not depend on a specific
//! microcontroller:
//!
//! - Bit timing table for the supported baud rates
//! - Fixed-capacity byte buffer for decoded sonde data
//! - Bit-banged serial receiver state machine
//! - Debug relay between a serial port and a debug port
//! - Configuration types and the `sonde.toml` parser
//! - Line simulator for host tests (`sim` feature)

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod relay;
pub mod rx;

#[cfg(any(test, feature = "sim"))]
pub mod sim;
