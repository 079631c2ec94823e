//! Busy-wait timing source
//!
//! Bit-banged reception blocks the only execution context for fixed
//! durations. The receiver never reads a clock; it only asks for delays,
//! so tests can substitute a virtual timer.

/// Blocking microsecond delay
pub trait BusyWait {
    /// Block for `us` microseconds
    fn wait_us(&mut self, us: u32);
}

impl<T: BusyWait + ?Sized> BusyWait for &mut T {
    fn wait_us(&mut self, us: u32) {
        T::wait_us(self, us)
    }
}

/// Wraps an `embedded-hal` delay provider
pub struct HalDelay<D>(pub D);

impl<D: embedded_hal::delay::DelayNs> BusyWait for HalDelay<D> {
    fn wait_us(&mut self, us: u32) {
        self.0.delay_us(us);
    }
}
