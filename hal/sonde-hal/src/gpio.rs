//! GPIO pin abstractions
//!
//! Provides traits for digital input and output pins that can be implemented
//! by chip-specific HALs, plus adapters for `embedded-hal` 1.0 pins.

use core::convert::Infallible;

/// Digital output pin
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Set the pin high (logic 1)
    fn set_high(&mut self);

    /// Set the pin low (logic 0)
    fn set_low(&mut self);

    /// Set the pin to a specific state
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the pin is currently set high
    fn is_set_high(&self) -> bool;
}

/// Digital input pin
///
/// Takes `&mut self` because sampling a line may advance hardware or
/// simulation state.
pub trait InputPin {
    /// Check if the pin reads high (logic 1)
    fn is_high(&mut self) -> bool;

    /// Check if the pin reads low (logic 0)
    fn is_low(&mut self) -> bool {
        !self.is_high()
    }
}

impl<T: InputPin + ?Sized> InputPin for &mut T {
    fn is_high(&mut self) -> bool {
        T::is_high(self)
    }
}

/// Wraps an infallible `embedded-hal` input pin
///
/// Most MCU HALs implement `embedded_hal::digital::InputPin` with
/// `Error = Infallible`; this lets them drive the receiver directly.
pub struct HalInput<P>(pub P);

impl<P> InputPin for HalInput<P>
where
    P: embedded_hal::digital::InputPin<Error = Infallible>,
{
    fn is_high(&mut self) -> bool {
        match self.0.is_high() {
            Ok(level) => level,
            Err(never) => match never {},
        }
    }
}

/// Wraps an infallible `embedded-hal` output pin
pub struct HalOutput<P> {
    pin: P,
    high: bool,
}

impl<P> HalOutput<P>
where
    P: embedded_hal::digital::OutputPin<Error = Infallible>,
{
    /// Wrap a pin, driving it to `initial_high`
    pub fn new(pin: P, initial_high: bool) -> Self {
        let mut out = Self {
            pin,
            high: !initial_high,
        };
        out.set_state(initial_high);
        out
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P> OutputPin for HalOutput<P>
where
    P: embedded_hal::digital::OutputPin<Error = Infallible>,
{
    fn set_high(&mut self) {
        if let Err(never) = self.pin.set_high() {
            match never {}
        }
        self.high = true;
    }

    fn set_low(&mut self) {
        if let Err(never) = self.pin.set_low() {
            match never {}
        }
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}
