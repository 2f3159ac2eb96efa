//! Per-frame eye compositor
//!
//! Maps one set of [`DrawParams`] onto the asset layers and streams the
//! result to a [`DisplaySink`] in raster order. For each screen pixel the
//! first matching rule wins:
//!
//! 1. covered by either eyelid: black
//! 2. outside the iris square: sclera
//! 3. polar distance below the iris threshold: iris map
//! 4. otherwise: sclera

use crate::assets::{EyeAssets, Grid, MAX_SCREEN_WIDTH};
use crate::color::Rgb565;
use crate::traits::DisplaySink;

/// Everything the compositor needs to draw one eye for one frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DrawParams {
    /// Index of the eye being drawn
    pub eye: usize,
    /// Iris scale (0-1023); larger means a wider pupil
    pub iris_scale: u16,
    /// First sclera column shown at screen x = 0
    pub sclera_x: u16,
    /// First sclera row shown at screen y = 0
    pub sclera_y: u16,
    /// Upper eyelid threshold; pixels at or below it are covered
    pub upper: u8,
    /// Lower eyelid threshold; pixels at or below it are covered
    pub lower: u8,
}

/// Polar distance below which a pixel belongs to the iris
pub const fn iris_threshold(iris_scale: u16) -> u8 {
    let scale: u32 = if iris_scale > 1023 { 1023 } else { iris_scale as u32 };
    ((128 * (1023 - scale) + 512) / 1024) as u8
}

/// Fixed-point (16.16) factor mapping polar distance to iris map rows
///
/// `None` when the threshold is zero; no pixel can be below it then.
pub const fn iris_scale_factor(threshold: u8, iris_map_height: u16) -> Option<u32> {
    if threshold == 0 {
        return None;
    }
    Some(((iris_map_height as u64 * 65536) / threshold as u64) as u32)
}

/// Render one full frame of one eye
///
/// Issues a single full-screen window followed by one `write_pixels` per
/// row. A sink error aborts the frame.
pub fn render_eye<S, C, L>(
    sink: &mut S,
    assets: &EyeAssets<C, L>,
    params: &DrawParams,
) -> Result<(), S::Error>
where
    S: DisplaySink + ?Sized,
    C: Grid<Cell = u16>,
    L: Grid<Cell = u8>,
{
    let geo = *assets.geometry();
    let width = geo.screen_width as usize;
    let height = geo.screen_height as usize;

    let threshold = iris_threshold(params.iris_scale);
    let factor = iris_scale_factor(threshold, geo.iris_map_height);
    let iris_size = geo.iris_size as i32;

    sink.set_window(0, 0, geo.screen_width - 1, geo.screen_height - 1)?;

    let mut row = [Rgb565::BLACK; MAX_SCREEN_WIDTH];
    for screen_y in 0..height {
        let sclera_y = params.sclera_y as usize + screen_y;
        let iris_y = sclera_y as i32 - geo.iris_offset_y() as i32;

        for (screen_x, out) in row[..width].iter_mut().enumerate() {
            let sclera_x = params.sclera_x as usize + screen_x;
            let iris_x = sclera_x as i32 - geo.iris_offset_x() as i32;

            *out = if covered(assets, screen_x, screen_y, params) {
                Rgb565::BLACK
            } else if iris_x < 0 || iris_x >= iris_size || iris_y < 0 || iris_y >= iris_size {
                assets.sclera_at(sclera_x, sclera_y)
            } else {
                let p = assets.polar.get(iris_y as usize, iris_x as usize).unwrap_or(0x7F);
                let distance = (p & 0x7F) as u32;
                match factor {
                    Some(factor) if distance < threshold as u32 => {
                        let iris_row = (distance * factor) >> 16;
                        let iris_col = geo.iris_map_width as u32 * (p >> 7) as u32 / 512;
                        assets.iris_at(iris_row as usize, iris_col as usize)
                    }
                    _ => assets.sclera_at(sclera_x, sclera_y),
                }
            };
        }

        sink.write_pixels(&row[..width])?;
    }

    Ok(())
}

#[inline]
fn covered<C, L>(assets: &EyeAssets<C, L>, x: usize, y: usize, params: &DrawParams) -> bool
where
    C: Grid<Cell = u16>,
    L: Grid<Cell = u8>,
{
    let lower = assets.lower.get(y, x).unwrap_or(0);
    let upper = assets.upper.get(y, x).unwrap_or(0);
    lower <= params.lower || upper <= params.upper
}
