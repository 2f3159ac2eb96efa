//! Light sensor trait

/// Errors that can occur while sampling an analog sensor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SensorError {
    /// ADC conversion error
    ConversionError,
    /// Reading out of expected range
    OutOfRange,
}

/// Trait for ambient light sensors (photocell, dial)
///
/// Takes `&mut self` because ADC reads typically require mutable access.
pub trait LightSensor {
    /// Read the current level as a 10-bit value (0-1023)
    fn read_level(&mut self) -> Result<u16, SensorError>;
}
