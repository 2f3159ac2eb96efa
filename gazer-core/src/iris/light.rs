//! Iris driven by an ambient light sensor
//!
//! Bright light gives a small pupil, darkness a large one.

use super::{IrisRange, IrisSource};
use crate::traits::{LightSensor, RandomSource};

/// How raw sensor readings map onto iris scale
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightResponse {
    /// Lowest usable reading
    pub min: u16,
    /// Highest usable reading
    pub max: u16,
    /// Gamma exponent applied to the normalized reading
    pub curve: Option<f32>,
    /// Low-pass the output with a 15/16 weight on the previous value
    pub smooth: bool,
    /// Sensor reads high in the dark
    pub flip: bool,
}

impl Default for LightResponse {
    fn default() -> Self {
        Self {
            min: 30,
            max: 980,
            curve: None,
            smooth: true,
            flip: false,
        }
    }
}

impl LightResponse {
    /// Unfiltered iris scale for a 10-bit reading
    pub fn map(&self, raw: u16, range: IrisRange) -> u16 {
        let mut v = raw.min(1023) as i32;
        if self.flip {
            v = 1023 - v;
        }
        let (lo, hi) = (self.min as i32, self.max as i32);
        let span = hi - lo;
        if span <= 0 {
            return range.max;
        }
        v = v.clamp(lo, hi) - lo;

        if let Some(curve) = self.curve {
            v = (libm::powf(v as f32 / span as f32, curve) * span as f32) as i32;
        }

        let (iris_min, iris_max) = (range.min as i32, range.max as i32);
        range.clip(v * (iris_min - iris_max) / span + iris_max)
    }
}

pub struct LightIris<S> {
    sensor: S,
    response: LightResponse,
    range: IrisRange,
    value: u16,
}

impl<S: LightSensor> LightIris<S> {
    pub fn new(sensor: S, response: LightResponse, range: IrisRange) -> Self {
        Self {
            sensor,
            response,
            range,
            value: range.center(),
        }
    }

    /// Last value produced
    pub fn value(&self) -> u16 {
        self.value
    }

    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }
}

impl<S: LightSensor> IrisSource for LightIris<S> {
    fn next_scale(&mut self, _now_us: u64, _rng: &mut impl RandomSource) -> u16 {
        // A failed read keeps the previous value
        if let Ok(raw) = self.sensor.read_level() {
            let target = self.response.map(raw, self.range);
            self.value = if self.response.smooth {
                ((self.value as u32 * 15 + target as u32) / 16) as u16
            } else {
                target
            };
        }
        self.range.clip(self.value as i32)
    }
}
