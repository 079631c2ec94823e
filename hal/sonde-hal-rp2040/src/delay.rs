//! Busy-wait delay
//!
//! `embassy_time::Delay` spins on the time driver without yielding to the
//! executor.

use embassy_time::Delay;
use sonde_hal::delay::HalDelay;

/// Blocking microsecond delay
pub type BlockingDelay = HalDelay<Delay>;

/// Delay on the embassy time driver
pub const fn blocking_delay() -> BlockingDelay {
    HalDelay(Delay)
}
