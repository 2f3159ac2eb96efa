//! Photocell light sensor
//!
//! A light-dependent resistor in a divider on an ADC pin. Brighter light
//! reads higher unless the divider is wired the other way round, which
//! the iris response handles with its `flip` setting.

use gazer_core::traits::{LightSensor, SensorError};

/// ADC reading trait for platform abstraction
pub trait AdcReader {
    /// Read ADC value (12-bit, 0-4095)
    #[allow(clippy::result_unit_err)]
    fn read(&mut self) -> Result<u16, ()>;
}

/// Full-scale 12-bit reading
const ADC_MAX: u16 = 4095;

/// Photocell on a 12-bit ADC, reported as a 10-bit level
pub struct Photocell<ADC> {
    adc: ADC,
    /// Samples averaged per reading
    oversample: u8,
}

impl<ADC> Photocell<ADC> {
    pub fn new(adc: ADC) -> Self {
        Self { adc, oversample: 1 }
    }

    /// Average `n` conversions per reading to calm a noisy divider
    pub fn with_oversample(adc: ADC, n: u8) -> Self {
        Self {
            adc,
            oversample: n.max(1),
        }
    }

    /// Convert a 12-bit conversion result to a 10-bit level
    pub fn to_level(raw: u16) -> Result<u16, SensorError> {
        if raw > ADC_MAX {
            return Err(SensorError::OutOfRange);
        }
        Ok(raw >> 2)
    }
}

impl<ADC: AdcReader> LightSensor for Photocell<ADC> {
    fn read_level(&mut self) -> Result<u16, SensorError> {
        let mut sum: u32 = 0;
        for _ in 0..self.oversample {
            let raw = self.adc.read().map_err(|_| SensorError::ConversionError)?;
            sum += Self::to_level(raw)? as u32;
        }
        Ok((sum / self.oversample as u32) as u16)
    }
}

/// Dummy ADC for testing (returns scripted values, then repeats the last)
#[cfg(test)]
pub struct DummyAdc {
    values: &'static [u16],
    next: usize,
}

#[cfg(test)]
impl AdcReader for DummyAdc {
    fn read(&mut self) -> Result<u16, ()> {
        let v = self.values.get(self.next).or(self.values.last()).copied().ok_or(())?;
        self.next += 1;
        Ok(v)
    }
}
