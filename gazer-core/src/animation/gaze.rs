//! Autonomous gaze motion shared by all eyes
//!
//! The gaze alternates between holding still for a random dwell and easing
//! toward a random point inside the unit circle. Positions are in
//! normalized units, 0..=1023 per axis, 512 at the center.

use super::ease::EASE;
use crate::traits::RandomSource;

/// Normalized center position
pub const GAZE_CENTER: i32 = 512;
/// Largest normalized coordinate
pub const GAZE_MAX: i32 = 1023;

/// Shortest eye movement, microseconds
pub const MOVE_MIN_US: u32 = 72_000;
/// Spread added to [`MOVE_MIN_US`]
pub const MOVE_SPREAD_US: u32 = 72_000;
/// Upper bound (exclusive) on the dwell between moves
pub const DWELL_MAX_US: u32 = 3_000_000;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct GazeState {
    old_x: i32,
    old_y: i32,
    new_x: i32,
    new_y: i32,
    in_motion: bool,
    start_us: u64,
    duration_us: u64,
}

impl Default for GazeState {
    fn default() -> Self {
        Self::new()
    }
}

impl GazeState {
    /// Centered and holding, with a zero dwell so the first update after
    /// time zero starts a move
    pub const fn new() -> Self {
        Self {
            old_x: GAZE_CENTER,
            old_y: GAZE_CENTER,
            new_x: GAZE_CENTER,
            new_y: GAZE_CENTER,
            in_motion: false,
            start_us: 0,
            duration_us: 0,
        }
    }

    pub fn in_motion(&self) -> bool {
        self.in_motion
    }

    /// Destination of the current (or last) move
    pub fn target(&self) -> (i32, i32) {
        (self.new_x, self.new_y)
    }

    /// Advance to `now_us` and return the gaze position for this frame
    pub fn update(&mut self, now_us: u64, rng: &mut impl RandomSource) -> (i32, i32) {
        let dt = now_us.saturating_sub(self.start_us);

        if self.in_motion {
            if dt >= self.duration_us {
                self.in_motion = false;
                self.duration_us = rng.below(DWELL_MAX_US) as u64;
                self.start_us = now_us;
                self.old_x = self.new_x;
                self.old_y = self.new_y;
                (self.old_x, self.old_y)
            } else {
                let e = EASE[(255 * dt / self.duration_us) as usize] as i32 + 1;
                (
                    self.old_x + (self.new_x - self.old_x) * e / 256,
                    self.old_y + (self.new_y - self.old_y) * e / 256,
                )
            }
        } else {
            let pos = (self.old_x, self.old_y);
            if dt > self.duration_us {
                let (x, y) = pick_target(&mut *rng);
                self.new_x = x;
                self.new_y = y;
                self.duration_us = (rng.below(MOVE_SPREAD_US) + MOVE_MIN_US) as u64;
                self.start_us = now_us;
                self.in_motion = true;
            }
            pos
        }
    }
}

/// Rejection-sample a point inside the circle inscribed in the gaze square
pub fn pick_target(rng: &mut impl RandomSource) -> (i32, i32) {
    loop {
        let x = rng.below(GAZE_MAX as u32 + 1) as i32;
        let y = rng.below(GAZE_MAX as u32 + 1) as i32;
        if in_circle(x, y) {
            return (x, y);
        }
    }
}

/// Whether a normalized point lies within the gaze circle
pub fn in_circle(x: i32, y: i32) -> bool {
    let dx = 2 * x - GAZE_MAX;
    let dy = 2 * y - GAZE_MAX;
    dx * dx + dy * dy <= GAZE_MAX * GAZE_MAX
}
