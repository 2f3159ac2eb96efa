//! Board glue: time source, ADC channels and the boot-time seed

use embassy_rp::adc::{Adc, Blocking, Channel};
use embassy_time::Instant;

use gazer_core::traits::Clock;
use gazer_drivers::sensor::AdcReader;

/// Monotonic clock backed by the embassy time driver
pub struct EmbassyClock;

impl Clock for EmbassyClock {
    fn now_us(&self) -> u64 {
        Instant::now().as_micros()
    }
}

/// One ADC channel read in blocking mode
pub struct BlockingAdc<'d> {
    adc: Adc<'d, Blocking>,
    channel: Channel<'d>,
}

impl<'d> BlockingAdc<'d> {
    pub fn new(adc: Adc<'d, Blocking>, channel: Channel<'d>) -> Self {
        Self { adc, channel }
    }
}

impl AdcReader for BlockingAdc<'_> {
    fn read(&mut self) -> Result<u16, ()> {
        self.adc.blocking_read(&mut self.channel).map_err(|_| ())
    }
}

/// Mix the low bits of repeated noisy conversions with the boot time
pub fn noise_seed(adc: &mut Adc<'_, Blocking>, channel: &mut Channel<'_>) -> u64 {
    let mut seed = Instant::now().as_ticks();
    for _ in 0..64 {
        if let Ok(v) = adc.blocking_read(channel) {
            seed = seed.rotate_left(5) ^ v as u64;
        }
    }
    seed
}
