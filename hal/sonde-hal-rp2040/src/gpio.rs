//! GPIO pins
//!
//! embassy-rp pins implement the `embedded-hal` 1.0 digital traits with
//! `Error = Infallible`, so the generic `sonde-hal` adapters drive them.

use embassy_rp::gpio::{Input, Output};
use sonde_hal::gpio::{HalInput, HalOutput};

/// Polled input pin (sonde RX line)
pub type RpInput<'d> = HalInput<Input<'d>>;

/// Output pin (sonde TX line, held idle)
pub type RpOutput<'d> = HalOutput<Output<'d>>;
