//! Upper eyelid follows the pupil
//!
//! Samples the upper lid map just above the pupil and low-pass filters the
//! result. The lower lid is pulled along by the upper one.

use crate::assets::{EyeAssets, Grid};

/// Filtered eyelid thresholds, shared by all eyes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EyelidTracker {
    upper: u8,
}

impl Default for EyelidTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl EyelidTracker {
    pub const INITIAL: u8 = 128;

    pub const fn new() -> Self {
        Self {
            upper: Self::INITIAL,
        }
    }

    /// Current filtered upper threshold
    pub fn upper(&self) -> u8 {
        self.upper
    }

    /// Feed the current sclera offset; returns `(upper, lower)` thresholds
    pub fn track<C, L>(&mut self, assets: &EyeAssets<C, L>, sclera_x: u16, sclera_y: u16) -> (u8, u8)
    where
        C: Grid<Cell = u16>,
        L: Grid<Cell = u8>,
    {
        let n = sample(assets, sclera_x, sclera_y);
        self.upper = ((self.upper as u16 * 3 + n as u16) / 4) as u8;
        (self.upper, 254u8.saturating_sub(self.upper))
    }
}

/// Average of two mirrored samples from the upper lid map, or 0 when
/// either falls outside it
fn sample<C, L>(assets: &EyeAssets<C, L>, sclera_x: u16, sclera_y: u16) -> u8
where
    C: Grid<Cell = u16>,
    L: Grid<Cell = u8>,
{
    let geo = assets.geometry();
    let x = geo.sclera_width as i32 / 2 - sclera_x as i32 / 2;
    let y = geo.sclera_height as i32 / 2 - (sclera_y as i32 + geo.iris_size as i32 / 4);
    let mirrored = geo.screen_width as i32 - 1 - x;
    if x < 0 || y < 0 || mirrored < 0 {
        return 0;
    }

    let a = assets.upper.get(y as usize, x as usize);
    let b = assets.upper.get(y as usize, mirrored as usize);
    match (a, b) {
        (Some(a), Some(b)) => ((a as u16 + b as u16) / 2) as u8,
        _ => 0,
    }
}
