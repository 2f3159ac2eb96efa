//! Precomputed bitmap layers
//!
//! An eye is drawn from five read-only grids:
//!
//! - `sclera`: 16-bit colors, larger than the screen so the gaze can pan
//!   across it
//! - `iris`: 16-bit colors indexed by (distance, angle), one row per
//!   polar distance step
//! - `polar`: 16-bit `(angle << 7) | distance` codes over the iris square
//! - `upper` / `lower`: 8-bit eyelid thresholds over screen coordinates
//!
//! Geometry is checked once in [`EyeAssets::new`]; after that every lookup
//! the compositor makes is in range.

use crate::color::Rgb565;

/// Widest screen the compositor's row buffer supports
pub const MAX_SCREEN_WIDTH: usize = 256;

/// Errors detected while validating asset geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AssetError {
    /// Backing slice does not match `width * height`
    LengthMismatch { expected: usize, actual: usize },
    /// A grid has zero width or height
    Empty,
    /// Eyelid maps are not the same size as the screen
    LidSize,
    /// Sclera is smaller than the screen
    ScleraTooSmall,
    /// Polar map is larger than the sclera, or not square
    PolarSize,
    /// Iris map has no rows or columns
    IrisSize,
    /// Screen is wider than [`MAX_SCREEN_WIDTH`]
    ScreenTooWide,
}

/// Read-only 2D lookup with bounds known at construction
pub trait Grid {
    type Cell: Copy;

    fn width(&self) -> usize;
    fn height(&self) -> usize;

    /// Cell at `(row, col)`, or `None` when out of range
    fn get(&self, row: usize, col: usize) -> Option<Self::Cell>;
}

/// Row-major grid backed by a slice
#[derive(Debug, Clone, Copy)]
pub struct SliceGrid<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
}

impl<'a, T: Copy> SliceGrid<'a, T> {
    pub fn new(data: &'a [T], width: usize, height: usize) -> Result<Self, AssetError> {
        if width == 0 || height == 0 {
            return Err(AssetError::Empty);
        }
        let expected = width * height;
        if data.len() != expected {
            return Err(AssetError::LengthMismatch {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
        })
    }

    /// Raw backing data
    pub fn data(&self) -> &'a [T] {
        self.data
    }
}

impl<T: Copy> Grid for SliceGrid<'_, T> {
    type Cell = T;

    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    #[inline]
    fn get(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }
}

impl<G: Grid + ?Sized> Grid for &G {
    type Cell = G::Cell;

    fn width(&self) -> usize {
        (**self).width()
    }

    fn height(&self) -> usize {
        (**self).height()
    }

    fn get(&self, row: usize, col: usize) -> Option<G::Cell> {
        (**self).get(row, col)
    }
}

/// Derived sizes shared by the compositor and the animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EyeGeometry {
    pub screen_width: u16,
    pub screen_height: u16,
    pub sclera_width: u16,
    pub sclera_height: u16,
    /// Side of the square polar map
    pub iris_size: u16,
    pub iris_map_width: u16,
    pub iris_map_height: u16,
}

impl EyeGeometry {
    /// Largest sclera X offset that keeps the screen inside the sclera
    pub const fn max_sclera_x(&self) -> u16 {
        self.sclera_width - self.screen_width
    }

    pub const fn max_sclera_y(&self) -> u16 {
        self.sclera_height - self.screen_height
    }

    /// Offset of the iris square inside the sclera, per axis
    pub const fn iris_offset_x(&self) -> u16 {
        (self.sclera_width - self.iris_size) / 2
    }

    pub const fn iris_offset_y(&self) -> u16 {
        (self.sclera_height - self.iris_size) / 2
    }
}

/// The full set of layers for one eye design
#[derive(Debug, Clone, Copy)]
pub struct EyeAssets<C, L> {
    pub sclera: C,
    pub iris: C,
    pub polar: C,
    pub upper: L,
    pub lower: L,
    geometry: EyeGeometry,
}

/// Assets backed by static tables
pub type StaticEyeAssets = EyeAssets<SliceGrid<'static, u16>, SliceGrid<'static, u8>>;

impl<C, L> EyeAssets<C, L>
where
    C: Grid<Cell = u16>,
    L: Grid<Cell = u8>,
{
    /// Bundle the layers, checking that their sizes agree
    ///
    /// The screen size is taken from the eyelid maps.
    pub fn new(sclera: C, iris: C, polar: C, upper: L, lower: L) -> Result<Self, AssetError> {
        for (w, h) in [
            (sclera.width(), sclera.height()),
            (iris.width(), iris.height()),
            (polar.width(), polar.height()),
            (upper.width(), upper.height()),
            (lower.width(), lower.height()),
        ] {
            if w == 0 || h == 0 {
                return Err(AssetError::Empty);
            }
        }

        if upper.width() != lower.width() || upper.height() != lower.height() {
            return Err(AssetError::LidSize);
        }
        let (screen_w, screen_h) = (upper.width(), upper.height());
        if screen_w > MAX_SCREEN_WIDTH {
            return Err(AssetError::ScreenTooWide);
        }
        if sclera.width() < screen_w || sclera.height() < screen_h {
            return Err(AssetError::ScleraTooSmall);
        }
        if polar.width() != polar.height()
            || polar.width() > sclera.width()
            || polar.height() > sclera.height()
        {
            return Err(AssetError::PolarSize);
        }
        if iris.width() > u16::MAX as usize || iris.height() > u16::MAX as usize {
            return Err(AssetError::IrisSize);
        }
        if sclera.width() > u16::MAX as usize || sclera.height() > u16::MAX as usize {
            return Err(AssetError::ScleraTooSmall);
        }

        let geometry = EyeGeometry {
            screen_width: screen_w as u16,
            screen_height: screen_h as u16,
            sclera_width: sclera.width() as u16,
            sclera_height: sclera.height() as u16,
            iris_size: polar.width() as u16,
            iris_map_width: iris.width() as u16,
            iris_map_height: iris.height() as u16,
        };

        Ok(Self {
            sclera,
            iris,
            polar,
            upper,
            lower,
            geometry,
        })
    }

    pub fn geometry(&self) -> &EyeGeometry {
        &self.geometry
    }

    /// Sclera color at sclera coordinates, black when out of range
    #[inline]
    pub fn sclera_at(&self, x: usize, y: usize) -> Rgb565 {
        Rgb565(self.sclera.get(y, x).unwrap_or(0))
    }

    /// Iris color at (distance row, angle column), black when out of range
    #[inline]
    pub fn iris_at(&self, row: usize, col: usize) -> Rgb565 {
        Rgb565(self.iris.get(row, col).unwrap_or(0))
    }
}
