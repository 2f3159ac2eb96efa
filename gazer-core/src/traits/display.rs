//! Display sink trait for raster panels addressed by rectangular windows

use crate::color::Rgb565;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Panel rotation in 90 degree steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Map a 0-3 index to a rotation, wrapping larger values
    pub const fn from_index(index: u8) -> Self {
        match index & 3 {
            0 => Self::Deg0,
            1 => Self::Deg90,
            2 => Self::Deg180,
            _ => Self::Deg270,
        }
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Whether width and height are exchanged in this orientation
    pub const fn is_transposed(self) -> bool {
        matches!(self, Self::Deg90 | Self::Deg270)
    }
}

/// Trait for a display that accepts a window followed by a pixel stream
///
/// After `set_window(x0, y0, x1, y1)` the device fills the inclusive
/// rectangle in raster order, wrapping at `x1`. Writing more or fewer pixels
/// than the window holds is a caller bug, not a transport error.
pub trait DisplaySink {
    /// Transport error
    type Error;

    /// Select the inclusive rectangle for subsequent pixel writes
    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), Self::Error>;

    /// Send one pixel
    fn write_pixel(&mut self, color: Rgb565) -> Result<(), Self::Error>;

    /// Send a run of pixels
    ///
    /// The default sends them one at a time; drivers should override this
    /// with a single bus transfer.
    fn write_pixels(&mut self, colors: &[Rgb565]) -> Result<(), Self::Error> {
        for &c in colors {
            self.write_pixel(c)?;
        }
        Ok(())
    }

    /// Change the scan orientation
    fn set_orientation(&mut self, rotation: Rotation) -> Result<(), Self::Error>;

    /// Mirror the scan horizontally, independent of rotation
    fn set_mirror(&mut self, enabled: bool) -> Result<(), Self::Error>;

    /// Logical width for the current orientation
    fn width(&self) -> u16;

    /// Logical height for the current orientation
    fn height(&self) -> u16;
}

/// Clipped drawing helpers on top of any [`DisplaySink`]
///
/// Requests that fall partly outside the panel are clipped; requests that
/// fall entirely outside, or have zero size, are ignored.
pub trait DisplayExt: DisplaySink {
    /// Fill a rectangle with one color
    fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb565) -> Result<(), Self::Error> {
        let Some((x0, y0, x1, y1)) = clip(x, y, w, h, self.width(), self.height()) else {
            return Ok(());
        };
        self.set_window(x0, y0, x1, y1)?;

        let row = [color; 32];
        let mut remaining = (x1 - x0 + 1) as usize * (y1 - y0 + 1) as usize;
        while remaining > 0 {
            let n = remaining.min(row.len());
            self.write_pixels(&row[..n])?;
            remaining -= n;
        }
        Ok(())
    }

    /// Fill the whole panel
    fn fill_screen(&mut self, color: Rgb565) -> Result<(), Self::Error> {
        let (w, h) = (self.width() as i32, self.height() as i32);
        self.fill_rect(0, 0, w, h, color)
    }

    fn draw_pixel(&mut self, x: i32, y: i32, color: Rgb565) -> Result<(), Self::Error> {
        self.fill_rect(x, y, 1, 1, color)
    }

    fn draw_hline(&mut self, x: i32, y: i32, w: i32, color: Rgb565) -> Result<(), Self::Error> {
        self.fill_rect(x, y, w, 1, color)
    }

    fn draw_vline(&mut self, x: i32, y: i32, h: i32, color: Rgb565) -> Result<(), Self::Error> {
        self.fill_rect(x, y, 1, h, color)
    }

    /// Draw a 1-bit bitmap, MSB first, rows padded to whole bytes
    ///
    /// Only set bits are drawn; clear bits leave the panel untouched.
    fn draw_bitmap(
        &mut self,
        x: i32,
        y: i32,
        bitmap: &[u8],
        w: i32,
        h: i32,
        color: Rgb565,
    ) -> Result<(), Self::Error> {
        if w <= 0 || h <= 0 {
            return Ok(());
        }
        let stride = ((w + 7) / 8) as usize;
        for row in 0..h {
            for col in 0..w {
                let idx = row as usize * stride + (col / 8) as usize;
                let Some(&byte) = bitmap.get(idx) else {
                    return Ok(());
                };
                if byte & (0x80 >> (col & 7)) != 0 {
                    self.draw_pixel(x + col, y + row, color)?;
                }
            }
        }
        Ok(())
    }
}

// Blanket implementation for all DisplaySink types
impl<T: DisplaySink + ?Sized> DisplayExt for T {}

/// Clip a rectangle to the panel, returning inclusive corners
fn clip(x: i32, y: i32, w: i32, h: i32, width: u16, height: u16) -> Option<(u16, u16, u16, u16)> {
    if w <= 0 || h <= 0 {
        return None;
    }
    let x0 = x.max(0);
    let y0 = y.max(0);
    let x1 = x.saturating_add(w).min(width as i32) - 1;
    let y1 = y.saturating_add(h).min(height as i32) - 1;
    if x0 > x1 || y0 > y1 {
        return None;
    }
    Some((x0 as u16, y0 as u16, x1 as u16, y1 as u16))
}
