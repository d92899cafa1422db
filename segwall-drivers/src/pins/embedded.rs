//! `embedded-hal` output pin adapter

use core::convert::Infallible;

use embedded_hal::digital::OutputPin as HalOutputPin;
use segwall_hal::{Level, OutputPin};

/// Wraps an infallible `embedded-hal` output pin
///
/// The driven level is remembered so it can be read back without touching
/// the hardware.
pub struct EmbeddedHalPin<T> {
    inner: T,
    high: bool,
}

impl<T: HalOutputPin<Error = Infallible>> EmbeddedHalPin<T> {
    /// Wrap a pin, driving it to `initial`
    pub fn new(inner: T, initial: Level) -> Self {
        let mut pin = Self { inner, high: false };
        pin.set_level(initial);
        pin
    }

    /// Unwrap the pin
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: HalOutputPin<Error = Infallible>> OutputPin for EmbeddedHalPin<T> {
    fn set_high(&mut self) {
        match self.inner.set_high() {
            Ok(()) => self.high = true,
            Err(never) => match never {},
        }
    }

    fn set_low(&mut self) {
        match self.inner.set_low() {
            Ok(()) => self.high = false,
            Err(never) => match never {},
        }
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}
