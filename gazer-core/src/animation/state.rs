//! Aggregate animation state and the per-frame tick

use heapless::Vec;

use super::blink::{BlinkState, BlinkTimer};
use super::eyelid::EyelidTracker;
use super::gaze::{GazeState, GAZE_MAX};
use crate::assets::{EyeAssets, EyeGeometry, Grid};
use crate::compositor::DrawParams;
use crate::traits::RandomSource;

/// Most eyes a rig can drive
pub const MAX_EYES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AnimationError {
    /// At least one eye is required
    NoEyes,
    /// More than [`MAX_EYES`] eyes
    TooManyEyes,
    /// Iris bounds are inverted or exceed 1023
    InvalidIrisRange,
}

/// Behavior switches and limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AnimationOptions {
    /// Upper eyelid follows the pupil
    pub tracking: bool,
    /// Blink on a random schedule
    pub autoblink: bool,
    pub iris_min: u16,
    pub iris_max: u16,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            tracking: true,
            autoblink: true,
            iris_min: 120,
            iris_max: 720,
        }
    }
}

/// Mounting correction for one eye
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GazeCalibration {
    /// Added to the normalized X position before clamping
    pub offset_x: i16,
    /// Added to the normalized Y position before clamping
    pub offset_y: i16,
    /// Display scans mirrored; flip the sclera X so both eyes look the
    /// same way
    pub mirror: bool,
}

impl GazeCalibration {
    /// Map a normalized gaze position to the sclera offset for this eye
    pub fn sclera_offset(&self, x: i32, y: i32, geo: &EyeGeometry) -> (u16, u16) {
        let x = (x + self.offset_x as i32).clamp(0, GAZE_MAX);
        let y = (y + self.offset_y as i32).clamp(0, GAZE_MAX);

        let max_x = geo.max_sclera_x() as i32;
        let max_y = geo.max_sclera_y() as i32;
        let mut px = x * max_x / GAZE_MAX;
        let py = y * max_y / GAZE_MAX;
        if self.mirror {
            px = max_x - px;
        }

        (px.clamp(0, max_x) as u16, py.clamp(0, max_y) as u16)
    }
}

/// Per-eye animation state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EyeAnimation {
    pub blink: BlinkState,
    pub calibration: GazeCalibration,
}

/// Everything that changes from frame to frame
///
/// Gaze and eyelid tracking are shared so the eyes move together; blinks
/// start together but each eye only advances its own blink when it is
/// the one being drawn.
#[derive(Debug, Clone)]
pub struct AnimationState {
    options: AnimationOptions,
    gaze: GazeState,
    blink_timer: BlinkTimer,
    lids: EyelidTracker,
    eyes: Vec<EyeAnimation, MAX_EYES>,
    next_eye: usize,
}

impl AnimationState {
    pub fn new(options: AnimationOptions, calibrations: &[GazeCalibration]) -> Result<Self, AnimationError> {
        if calibrations.is_empty() {
            return Err(AnimationError::NoEyes);
        }
        if options.iris_min >= options.iris_max || options.iris_max > 1023 {
            return Err(AnimationError::InvalidIrisRange);
        }

        let mut eyes = Vec::new();
        for &calibration in calibrations {
            eyes.push(EyeAnimation {
                blink: BlinkState::new(),
                calibration,
            })
            .map_err(|_| AnimationError::TooManyEyes)?;
        }

        Ok(Self {
            options,
            gaze: GazeState::new(),
            blink_timer: BlinkTimer::new(),
            lids: EyelidTracker::new(),
            eyes,
            next_eye: 0,
        })
    }

    pub fn options(&self) -> &AnimationOptions {
        &self.options
    }

    pub fn eye_count(&self) -> usize {
        self.eyes.len()
    }

    pub fn eye(&self, index: usize) -> Option<&EyeAnimation> {
        self.eyes.get(index)
    }

    pub fn eye_mut(&mut self, index: usize) -> Option<&mut EyeAnimation> {
        self.eyes.get_mut(index)
    }

    pub fn gaze(&self) -> &GazeState {
        &self.gaze
    }

    /// Index of the eye the next tick will draw
    pub fn next_eye(&self) -> usize {
        self.next_eye
    }

    /// Advance the animation to `now_us` and produce draw parameters for
    /// the next eye in round-robin order
    pub fn tick<C, L>(
        &mut self,
        now_us: u64,
        iris_scale: u16,
        assets: &EyeAssets<C, L>,
        rng: &mut impl RandomSource,
    ) -> DrawParams
    where
        C: Grid<Cell = u16>,
        L: Grid<Cell = u8>,
    {
        let eye = self.next_eye;
        self.next_eye = (eye + 1) % self.eyes.len();

        let (gaze_x, gaze_y) = self.gaze.update(now_us, &mut *rng);

        if self.options.autoblink {
            if let Some(duration) = self.blink_timer.poll(now_us, &mut *rng) {
                for e in self.eyes.iter_mut() {
                    e.blink.begin(now_us, duration);
                }
            }
        }

        let slot = &mut self.eyes[eye];
        slot.blink.advance(now_us);

        let (sclera_x, sclera_y) = slot.calibration.sclera_offset(gaze_x, gaze_y, assets.geometry());

        let (upper, lower) = if self.options.tracking {
            self.lids.track(assets, sclera_x, sclera_y)
        } else {
            (0, 0)
        };
        let (upper, lower) = slot.blink.blend(now_us, upper, lower);

        DrawParams {
            eye,
            iris_scale: iris_scale.clamp(self.options.iris_min, self.options.iris_max),
            sclera_x,
            sclera_y,
            upper,
            lower,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::BlinkPhase;
    use crate::testing::*;
    use crate::traits::RngSource;
    use proptest::prelude::*;
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    fn quiet() -> AnimationOptions {
        AnimationOptions {
            tracking: false,
            autoblink: false,
            ..AnimationOptions::default()
        }
    }

    fn two_eyes() -> [GazeCalibration; 2] {
        [
            GazeCalibration::default(),
            GazeCalibration {
                mirror: true,
                ..GazeCalibration::default()
            },
        ]
    }

    #[test]
    fn test_new_validates() {
        assert_eq!(
            AnimationState::new(quiet(), &[]).unwrap_err(),
            AnimationError::NoEyes
        );
        assert_eq!(
            AnimationState::new(quiet(), &[GazeCalibration::default(); 3]).unwrap_err(),
            AnimationError::TooManyEyes
        );
        let inverted = AnimationOptions {
            iris_min: 700,
            iris_max: 100,
            ..quiet()
        };
        assert_eq!(
            AnimationState::new(inverted, &two_eyes()).unwrap_err(),
            AnimationError::InvalidIrisRange
        );
    }

    #[test]
    fn test_round_robin_from_zero() {
        let eye = synthetic_eye();
        let mut state = AnimationState::new(quiet(), &two_eyes()).unwrap();
        let mut rng = ScriptedRng::new(&[]);

        let order: std::vec::Vec<usize> = (0..5)
            .map(|i| state.tick(i * 1000, 500, &eye, &mut rng).eye)
            .collect();
        assert_eq!(order, vec![0, 1, 0, 1, 0]);
    }

    #[test]
    fn test_iris_scale_clipped() {
        let eye = synthetic_eye();
        let mut state = AnimationState::new(quiet(), &two_eyes()).unwrap();
        let mut rng = ScriptedRng::new(&[]);

        assert_eq!(state.tick(0, 5, &eye, &mut rng).iris_scale, 120);
        assert_eq!(state.tick(0, 1000, &eye, &mut rng).iris_scale, 720);
        assert_eq!(state.tick(0, 400, &eye, &mut rng).iris_scale, 400);
    }

    #[test]
    fn test_centered_gaze_maps_to_center() {
        let eye = synthetic_eye();
        let mut state = AnimationState::new(quiet(), &two_eyes()).unwrap();
        let mut rng = ScriptedRng::new(&[]);

        // 512 * 4 / 1023 = 2; mirrored 4 - 2 = 2
        let left = state.tick(0, 500, &eye, &mut rng);
        let right = state.tick(0, 500, &eye, &mut rng);
        assert_eq!((left.sclera_x, left.sclera_y), (2, 2));
        assert_eq!((right.sclera_x, right.sclera_y), (2, 2));
        assert_eq!((left.upper, left.lower), (0, 0));
    }

    #[test]
    fn test_calibration_offset_and_mirror() {
        let geo = *synthetic_eye().geometry();
        let plain = GazeCalibration::default();
        let mirrored = GazeCalibration {
            mirror: true,
            ..plain
        };
        let shifted = GazeCalibration {
            offset_x: -128,
            offset_y: 224,
            mirror: false,
        };

        assert_eq!(plain.sclera_offset(1023, 0, &geo), (4, 0));
        assert_eq!(mirrored.sclera_offset(1023, 0, &geo), (0, 0));
        assert_eq!(mirrored.sclera_offset(0, 1023, &geo), (4, 4));
        // 1023 - 128 = 895 -> 895 * 4 / 1023 = 3; 900 + 224 clamps to 1023
        assert_eq!(shifted.sclera_offset(1023, 900, &geo), (3, 4));
        assert_eq!(shifted.sclera_offset(50, 0, &geo), (0, 0));
    }

    #[test]
    fn test_tracking_sets_complementary_lids() {
        let eye = synthetic_eye_with_lids(
            VecGrid::filled(SCREEN, SCREEN, 60),
            VecGrid::filled(SCREEN, SCREEN, 255),
        );
        let options = AnimationOptions {
            tracking: true,
            autoblink: false,
            ..AnimationOptions::default()
        };
        let mut state = AnimationState::new(options, &two_eyes()).unwrap();
        let mut rng = ScriptedRng::new(&[]);

        let p = state.tick(0, 500, &eye, &mut rng);
        assert_eq!(p.upper, ((128u32 * 3 + 60) / 4) as u8);
        assert_eq!(p.lower, 254 - p.upper);
    }

    #[test]
    fn test_blink_schedule_scenario() {
        let eye = synthetic_eye();
        let options = AnimationOptions {
            tracking: false,
            autoblink: true,
            ..AnimationOptions::default()
        };
        let mut state = AnimationState::new(options, &[GazeCalibration::default()]).unwrap();
        // Blink close time 36000 + 14000, next blink far away
        let mut rng = ScriptedRng::new(&[14_000, 3_999_999]);

        let p = state.tick(0, 500, &eye, &mut rng);
        assert_eq!(state.eye(0).unwrap().blink.phase, BlinkPhase::Closing);
        assert_eq!(state.eye(0).unwrap().blink.duration_us, 50_000);
        // s = 256 at the start of closing
        assert_eq!((p.upper, p.lower), (0, 0));

        state.tick(25_000, 500, &eye, &mut rng);
        assert_eq!(state.eye(0).unwrap().blink.phase, BlinkPhase::Closing);

        let p = state.tick(50_001, 500, &eye, &mut rng);
        let blink = state.eye(0).unwrap().blink;
        assert_eq!(blink.phase, BlinkPhase::Opening);
        assert_eq!(blink.duration_us, 100_000);
        assert_eq!(blink.start_us, 50_001);
        assert_eq!((p.upper, p.lower), (254, 254));

        state.tick(150_000, 500, &eye, &mut rng);
        assert_eq!(state.eye(0).unwrap().blink.phase, BlinkPhase::Opening);

        state.tick(150_002, 500, &eye, &mut rng);
        assert_eq!(state.eye(0).unwrap().blink.phase, BlinkPhase::Idle);
    }

    #[test]
    fn test_only_ticked_eye_advances_blink() {
        let eye = synthetic_eye();
        let options = AnimationOptions {
            tracking: false,
            autoblink: true,
            ..AnimationOptions::default()
        };
        let mut state = AnimationState::new(options, &two_eyes()).unwrap();
        let mut rng = ScriptedRng::new(&[14_000, 3_999_999]);

        // Both eyes start closing; eye 0 is drawn
        state.tick(0, 500, &eye, &mut rng);
        assert_eq!(state.eye(1).unwrap().blink.phase, BlinkPhase::Closing);

        // Eye 1 is drawn past the close time and opens; eye 0 stays closing
        state.tick(60_000, 500, &eye, &mut rng);
        assert_eq!(state.eye(1).unwrap().blink.phase, BlinkPhase::Opening);
        assert_eq!(state.eye(0).unwrap().blink.phase, BlinkPhase::Closing);
    }

    proptest! {
        #[test]
        fn prop_params_within_geometry(seed in any::<u64>(), steps in proptest::collection::vec(1u64..100_000, 1..100)) {
            let eye = synthetic_eye();
            let geo = *eye.geometry();
            let mut state = AnimationState::new(AnimationOptions::default(), &two_eyes()).unwrap();
            let mut rng = RngSource(SmallRng::seed_from_u64(seed));
            let mut now = 0;
            for step in steps {
                now += step;
                let p = state.tick(now, 1023, &eye, &mut rng);
                prop_assert!(p.sclera_x <= geo.max_sclera_x());
                prop_assert!(p.sclera_y <= geo.max_sclera_y());
                prop_assert!(p.upper <= 254 && p.lower <= 254);
                prop_assert_eq!(p.iris_scale, 720);
            }
        }
    }
}
