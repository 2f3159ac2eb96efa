//! Iris dilation
//!
//! Produces one iris scale per frame, either from an ambient light reading
//! or from an autonomous fractal wander between the configured bounds.

pub mod fractal;
pub mod light;

pub use fractal::FractalIris;
pub use light::{LightIris, LightResponse};

use crate::traits::{LightSensor, RandomSource};

/// Iris scale bounds, both within 0..=1023
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct IrisRange {
    pub min: u16,
    pub max: u16,
}

impl IrisRange {
    pub const fn new(min: u16, max: u16) -> Self {
        Self { min, max }
    }

    /// Midpoint, the resting scale
    pub const fn center(&self) -> u16 {
        (self.min + self.max) / 2
    }

    pub const fn span(&self) -> u16 {
        self.max.saturating_sub(self.min)
    }

    pub fn clip(&self, value: i32) -> u16 {
        value.clamp(self.min as i32, self.max as i32) as u16
    }
}

impl Default for IrisRange {
    fn default() -> Self {
        Self::new(120, 720)
    }
}

/// Source of per-frame iris scale values
pub trait IrisSource {
    /// Scale for the frame at `now_us`, already clipped to the range
    fn next_scale(&mut self, now_us: u64, rng: &mut impl RandomSource) -> u16;
}

/// The two iris strategies behind one type
pub enum IrisDriver<S> {
    Light(LightIris<S>),
    Fractal(FractalIris),
}

impl<S: LightSensor> IrisSource for IrisDriver<S> {
    fn next_scale(&mut self, now_us: u64, rng: &mut impl RandomSource) -> u16 {
        match self {
            Self::Light(light) => light.next_scale(now_us, rng),
            Self::Fractal(fractal) => fractal.next_scale(now_us, rng),
        }
    }
}
