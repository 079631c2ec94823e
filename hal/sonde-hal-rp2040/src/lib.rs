//! RP2040-specific HAL for the Sonde Link firmware
//!
//! Implements the shared `sonde-hal` traits on top of `embassy-rp`:
//!
//! - GPIO input/output pins through the `embedded-hal` adapters
//! - Busy-wait delay on the embassy time driver
//! - Buffered UART receive port for the debug relay

#![no_std]

pub mod delay;
pub mod gpio;
pub mod uart;

pub use delay::{blocking_delay, BlockingDelay};
pub use gpio::{RpInput, RpOutput};
pub use uart::RpUartRx;
