//! The frame loop body
//!
//! An [`EyeRig`] owns the displays, the shared asset set, the animation
//! state and the iris source, and draws one eye per call to
//! [`EyeRig::run_frame`].

use heapless::Vec;

use crate::animation::{AnimationError, AnimationOptions, AnimationState, GazeCalibration, MAX_EYES};
use crate::assets::{EyeAssets, Grid};
use crate::compositor::{render_eye, DrawParams};
use crate::iris::IrisSource;
use crate::splash::draw_splash;
use crate::traits::{Clock, DisplaySink, RandomSource, Rotation};

/// Frames between frame-rate reports
pub const FPS_REPORT_INTERVAL: u32 = 256;

/// Errors from driving the rig
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RigError<E> {
    /// A display transfer failed
    Display { eye: usize, error: E },
    /// Display count does not match the configured eyes
    EyeCount { displays: usize, eyes: usize },
    /// Animation setup rejected
    Animation(AnimationError),
}

impl<E> From<AnimationError> for RigError<E> {
    fn from(e: AnimationError) -> Self {
        RigError::Animation(e)
    }
}

/// Average frame rate since start, reported every
/// [`FPS_REPORT_INTERVAL`] frames
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameStats {
    frames: u32,
    start_ms: u64,
}

impl FrameStats {
    pub const fn new(start_ms: u64) -> Self {
        Self {
            frames: 0,
            start_ms,
        }
    }

    pub fn frames(&self) -> u32 {
        self.frames
    }

    /// Count a frame; returns frames per second on every report interval
    pub fn record(&mut self, now_ms: u64) -> Option<u32> {
        self.frames = self.frames.wrapping_add(1);
        if self.frames % FPS_REPORT_INTERVAL != 0 {
            return None;
        }
        let elapsed = now_ms.saturating_sub(self.start_ms);
        if elapsed == 0 {
            return None;
        }
        Some((self.frames as u64 * 1000 / elapsed) as u32)
    }
}

/// How one display is mounted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EyeMount {
    pub rotation: Rotation,
    pub calibration: GazeCalibration,
}

/// Outcome of one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FrameReport {
    pub params: DrawParams,
    /// Set on report frames
    pub fps: Option<u32>,
}

struct EyeSlot<D> {
    display: D,
    mount: EyeMount,
}

pub struct EyeRig<D, C, L, I> {
    eyes: Vec<EyeSlot<D>, MAX_EYES>,
    assets: EyeAssets<C, L>,
    animation: AnimationState,
    iris: I,
    stats: FrameStats,
}

impl<D, C, L, I> EyeRig<D, C, L, I>
where
    D: DisplaySink,
    C: Grid<Cell = u16>,
    L: Grid<Cell = u8>,
    I: IrisSource,
{
    /// Pair each display with its mount, in order
    pub fn new(
        displays: impl IntoIterator<Item = D>,
        mounts: &[EyeMount],
        assets: EyeAssets<C, L>,
        options: AnimationOptions,
        iris: I,
        start_ms: u64,
    ) -> Result<Self, RigError<D::Error>> {
        let mut eyes = Vec::new();
        let mut displays = displays.into_iter();
        for &mount in mounts {
            let Some(display) = displays.next() else {
                return Err(RigError::EyeCount {
                    displays: eyes.len(),
                    eyes: mounts.len(),
                });
            };
            if eyes.push(EyeSlot { display, mount }).is_err() {
                return Err(AnimationError::TooManyEyes.into());
            }
        }
        let extra = displays.count();
        if extra > 0 {
            return Err(RigError::EyeCount {
                displays: eyes.len() + extra,
                eyes: mounts.len(),
            });
        }

        let mut calibrations: Vec<GazeCalibration, MAX_EYES> = Vec::new();
        for slot in eyes.iter() {
            // Same capacity as `eyes`
            let _ = calibrations.push(slot.mount.calibration);
        }
        let animation = AnimationState::new(options, &calibrations)?;

        Ok(Self {
            eyes,
            assets,
            animation,
            iris,
            stats: FrameStats::new(start_ms),
        })
    }

    pub fn eye_count(&self) -> usize {
        self.eyes.len()
    }

    pub fn animation(&self) -> &AnimationState {
        &self.animation
    }

    pub fn assets(&self) -> &EyeAssets<C, L> {
        &self.assets
    }

    pub fn display_mut(&mut self, eye: usize) -> Option<&mut D> {
        self.eyes.get_mut(eye).map(|slot| &mut slot.display)
    }

    /// Apply each display's rotation and mirror setting
    pub fn configure_displays(&mut self) -> Result<(), RigError<D::Error>> {
        for (eye, slot) in self.eyes.iter_mut().enumerate() {
            slot.display
                .set_orientation(slot.mount.rotation)
                .and_then(|_| slot.display.set_mirror(slot.mount.calibration.mirror))
                .map_err(|error| RigError::Display { eye, error })?;
        }
        Ok(())
    }

    /// Draw the orientation card on every display
    pub fn show_splash(&mut self) -> Result<(), RigError<D::Error>> {
        for (eye, slot) in self.eyes.iter_mut().enumerate() {
            draw_splash(&mut slot.display, eye).map_err(|error| RigError::Display { eye, error })?;
        }
        Ok(())
    }

    /// Advance the animation and draw the next eye
    pub fn run_frame(
        &mut self,
        clock: &impl Clock,
        rng: &mut impl RandomSource,
    ) -> Result<FrameReport, RigError<D::Error>> {
        let now_us = clock.now_us();
        let fps = self.stats.record(now_us / 1000);

        let scale = self.iris.next_scale(now_us, &mut *rng);
        let params = self.animation.tick(now_us, scale, &self.assets, &mut *rng);

        let eye = params.eye;
        if let Some(slot) = self.eyes.get_mut(eye) {
            render_eye(&mut slot.display, &self.assets, &params)
                .map_err(|error| RigError::Display { eye, error })?;
        }

        Ok(FrameReport { params, fps })
    }
}
