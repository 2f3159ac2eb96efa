//! Mock bus, pins and delay that record into one shared log

use std::cell::RefCell;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, Operation, SpiDevice};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Dc(bool),
    Rst(bool),
    Write(Vec<u8>),
    DelayMs(u32),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusFault;

impl spi::Error for BusFault {
    fn kind(&self) -> spi::ErrorKind {
        spi::ErrorKind::Other
    }
}

impl digital::Error for BusFault {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

pub struct MockSpi {
    log: Log,
    pub fail: bool,
}

impl MockSpi {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            fail: false,
        }
    }
}

impl spi::ErrorType for MockSpi {
    type Error = BusFault;
}

impl SpiDevice for MockSpi {
    fn transaction(&mut self, operations: &mut [Operation<'_, u8>]) -> Result<(), BusFault> {
        if self.fail {
            return Err(BusFault);
        }
        for op in operations.iter() {
            if let Operation::Write(bytes) = op {
                self.log.borrow_mut().push(Event::Write(bytes.to_vec()));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub enum PinRole {
    Dc,
    Rst,
}

pub struct MockPin {
    log: Log,
    role: PinRole,
    pub fail: bool,
}

impl MockPin {
    pub fn new(log: &Log, role: PinRole) -> Self {
        Self {
            log: log.clone(),
            role,
            fail: false,
        }
    }

    fn set(&mut self, level: bool) -> Result<(), BusFault> {
        if self.fail {
            return Err(BusFault);
        }
        let event = match self.role {
            PinRole::Dc => Event::Dc(level),
            PinRole::Rst => Event::Rst(level),
        };
        self.log.borrow_mut().push(event);
        Ok(())
    }
}

impl digital::ErrorType for MockPin {
    type Error = BusFault;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), BusFault> {
        self.set(false)
    }

    fn set_high(&mut self) -> Result<(), BusFault> {
        self.set(true)
    }
}

pub struct MockDelay {
    log: Log,
}

impl MockDelay {
    pub fn new(log: &Log) -> Self {
        Self { log: log.clone() }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, _ns: u32) {}

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Event::DelayMs(ms));
    }
}

/// Bytes written while DC was low, each paired with the data that followed
pub fn commands(log: &Log) -> Vec<(u8, Vec<u8>)> {
    let mut out: Vec<(u8, Vec<u8>)> = Vec::new();
    let mut dc = true;
    for event in log.borrow().iter() {
        match event {
            Event::Dc(level) => dc = *level,
            Event::Write(bytes) if !dc => {
                for &b in bytes {
                    out.push((b, Vec::new()));
                }
            }
            Event::Write(bytes) => {
                if let Some(last) = out.last_mut() {
                    last.1.extend_from_slice(bytes);
                }
            }
            _ => {}
        }
    }
    out
}
