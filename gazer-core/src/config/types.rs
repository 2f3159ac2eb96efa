//! Configuration type definitions
//!
//! These types mirror the sections of `eyes.toml`. Every field has a
//! default so a partial file is valid.

use heapless::{String, Vec};

use crate::animation::{AnimationOptions, GazeCalibration, MAX_EYES};
use crate::iris::{IrisRange, LightResponse};
use crate::rig::EyeMount;
use crate::traits::Rotation;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Maximum eye name length
pub const MAX_NAME_LEN: usize = 16;

/// Largest gaze calibration offset, in normalized units
pub const MAX_GAZE_OFFSET: i16 = 1023;

/// Configuration validation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// No `[eye.*]` section
    NoEyes,
    /// `iris_min` must be below `iris_max`, which must not exceed 1023
    IrisRange,
    /// Light sensor `min` must be below `max`, both within 0..=1023
    LightRange,
    /// Gamma exponent must be positive and finite
    LightCurve,
    /// Rotation outside 0-3
    Rotation,
    /// Gaze offset outside -1023..=1023
    GazeOffset,
    /// Fractal cycle must be at least one microsecond
    CycleDuration,
    /// Display dimensions must be non-zero
    ScreenSize,
}

/// Display panel settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplayConfig {
    pub width: u16,
    pub height: u16,
    /// SPI clock in Hz
    pub spi_frequency: u32,
    /// Consecutive frame failures before the displays are re-initialized
    pub max_failures: u8,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            spi_frequency: 16_000_000,
            max_failures: 8,
        }
    }
}

/// Animation behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AnimationConfig {
    pub tracking: bool,
    pub autoblink: bool,
    pub iris_min: u16,
    pub iris_max: u16,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            tracking: true,
            autoblink: true,
            iris_min: 120,
            iris_max: 720,
        }
    }
}

impl AnimationConfig {
    pub fn options(&self) -> AnimationOptions {
        AnimationOptions {
            tracking: self.tracking,
            autoblink: self.autoblink,
            iris_min: self.iris_min,
            iris_max: self.iris_max,
        }
    }

    pub fn iris_range(&self) -> IrisRange {
        IrisRange::new(self.iris_min, self.iris_max)
    }
}

/// Where the iris scale comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum IrisMode {
    /// Fractal wander, no sensor needed
    #[default]
    Autonomous,
    /// Follow the ambient light sensor
    LightSensor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IrisConfig {
    pub mode: IrisMode,
    /// Length of one fractal cycle
    pub cycle_us: u32,
}

impl Default for IrisConfig {
    fn default() -> Self {
        Self {
            mode: IrisMode::Autonomous,
            cycle_us: 10_000_000,
        }
    }
}

/// Light sensor response
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LightSensorConfig {
    pub min: u16,
    pub max: u16,
    pub curve: Option<f32>,
    pub smooth: bool,
    pub flip: bool,
}

impl Default for LightSensorConfig {
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

impl LightSensorConfig {
    pub fn response(&self) -> LightResponse {
        LightResponse {
            min: self.min,
            max: self.max,
            curve: self.curve,
            smooth: self.smooth,
            flip: self.flip,
        }
    }
}

/// One eye, in display order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EyeConfig {
    pub name: String<MAX_NAME_LEN>,
    /// Rotation index, 0-3
    pub rotation: u8,
    /// Mirror the display scan and flip the gaze X
    pub mirror: bool,
    pub gaze_offset_x: i16,
    pub gaze_offset_y: i16,
}

impl EyeConfig {
    pub fn named(name: &str) -> Self {
        Self {
            name: String::try_from(name).unwrap_or_default(),
            ..Self::default()
        }
    }

    pub fn mount(&self) -> EyeMount {
        EyeMount {
            rotation: Rotation::from_index(self.rotation),
            calibration: GazeCalibration {
                offset_x: self.gaze_offset_x,
                offset_y: self.gaze_offset_y,
                mirror: self.mirror,
            },
        }
    }
}

/// Complete configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RigConfig {
    pub display: DisplayConfig,
    pub animation: AnimationConfig,
    pub iris: IrisConfig,
    pub light_sensor: LightSensorConfig,
    pub eyes: Vec<EyeConfig, MAX_EYES>,
}

impl Default for RigConfig {
    /// Two eyes, the second mirrored
    fn default() -> Self {
        let mut eyes = Vec::new();
        let _ = eyes.push(EyeConfig::named("left"));
        let _ = eyes.push(EyeConfig {
            mirror: true,
            ..EyeConfig::named("right")
        });
        Self {
            display: DisplayConfig::default(),
            animation: AnimationConfig::default(),
            iris: IrisConfig::default(),
            light_sensor: LightSensorConfig::default(),
            eyes,
        }
    }
}

impl RigConfig {
    /// Empty configuration with defaults and no eyes
    pub fn new() -> Self {
        Self {
            eyes: Vec::new(),
            ..Self::default()
        }
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.eyes.is_empty() {
            return Err(ConfigError::NoEyes);
        }
        if self.display.width == 0 || self.display.height == 0 {
            return Err(ConfigError::ScreenSize);
        }
        let a = &self.animation;
        if a.iris_min >= a.iris_max || a.iris_max > 1023 {
            return Err(ConfigError::IrisRange);
        }
        let l = &self.light_sensor;
        if l.min >= l.max || l.max > 1023 {
            return Err(ConfigError::LightRange);
        }
        if let Some(curve) = l.curve {
            if !curve.is_finite() || curve <= 0.0 {
                return Err(ConfigError::LightCurve);
            }
        }
        if self.iris.cycle_us == 0 {
            return Err(ConfigError::CycleDuration);
        }
        for eye in &self.eyes {
            if eye.rotation > 3 {
                return Err(ConfigError::Rotation);
            }
            let limit = MAX_GAZE_OFFSET as u16;
            if eye.gaze_offset_x.unsigned_abs() > limit || eye.gaze_offset_y.unsigned_abs() > limit {
                return Err(ConfigError::GazeOffset);
            }
        }
        Ok(())
    }

    /// Mounts for every configured eye, in order
    pub fn mounts(&self) -> Vec<EyeMount, MAX_EYES> {
        self.eyes.iter().map(EyeConfig::mount).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = RigConfig::default();
        assert_eq!(config.validate(), Ok(()));
        assert_eq!(config.eyes.len(), 2);
        assert!(!config.eyes[0].mirror);
        assert!(config.eyes[1].mirror);
    }

    #[test]
    fn test_new_has_no_eyes() {
        assert_eq!(RigConfig::new().validate(), Err(ConfigError::NoEyes));
    }

    #[test]
    fn test_validate_ranges() {
        let mut c = RigConfig::default();
        c.animation.iris_min = 800;
        assert_eq!(c.validate(), Err(ConfigError::IrisRange));

        let mut c = RigConfig::default();
        c.light_sensor.max = 2000;
        assert_eq!(c.validate(), Err(ConfigError::LightRange));

        let mut c = RigConfig::default();
        c.light_sensor.curve = Some(-1.0);
        assert_eq!(c.validate(), Err(ConfigError::LightCurve));

        let mut c = RigConfig::default();
        c.eyes[0].rotation = 4;
        assert_eq!(c.validate(), Err(ConfigError::Rotation));

        let mut c = RigConfig::default();
        c.eyes[1].gaze_offset_y = -1024;
        assert_eq!(c.validate(), Err(ConfigError::GazeOffset));

        let mut c = RigConfig::default();
        c.iris.cycle_us = 0;
        assert_eq!(c.validate(), Err(ConfigError::CycleDuration));
    }

    #[test]
    fn test_mount_from_eye() {
        let eye = EyeConfig {
            rotation: 2,
            mirror: true,
            gaze_offset_x: -128,
            gaze_offset_y: 224,
            ..EyeConfig::named("right")
        };
        let mount = eye.mount();
        assert_eq!(mount.rotation, Rotation::Deg180);
        assert_eq!(mount.calibration.offset_x, -128);
        assert_eq!(mount.calibration.offset_y, 224);
        assert!(mount.calibration.mirror);
    }
}
