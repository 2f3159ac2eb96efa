//! Output pin shared between drivers
//!
//! Both eye panels sit on one SPI bus and one data/command line. Each
//! driver gets its own `SharedPin` handle onto the same `RefCell`; the
//! borrow lasts only for a single level change, so handles never overlap
//! on one thread.

use core::cell::RefCell;

use embedded_hal::digital::{ErrorType, OutputPin};

pub struct SharedPin<'a, P> {
    pin: &'a RefCell<P>,
}

impl<'a, P> SharedPin<'a, P> {
    pub fn new(pin: &'a RefCell<P>) -> Self {
        Self { pin }
    }
}

impl<P: ErrorType> ErrorType for SharedPin<'_, P> {
    type Error = P::Error;
}

impl<P: OutputPin> OutputPin for SharedPin<'_, P> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin.borrow_mut().set_low()
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin.borrow_mut().set_high()
    }
}
