//! Shared test doubles: a small synthetic eye, a recording display,
//! a scripted random source and a manually stepped clock.

use std::cell::Cell;
use std::collections::VecDeque;

use crate::assets::{EyeAssets, Grid};
use crate::color::Rgb565;
use crate::traits::{Clock, DisplaySink, RandomSource, Rotation};

/// Owned row-major grid
#[derive(Debug, Clone)]
pub struct VecGrid<T> {
    pub data: Vec<T>,
    pub width: usize,
    pub height: usize,
}

impl<T: Copy> VecGrid<T> {
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            data: vec![value; width * height],
            width,
            height,
        }
    }

    pub fn from_fn(width: usize, height: usize, f: impl Fn(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for row in 0..height {
            for col in 0..width {
                data.push(f(row, col));
            }
        }
        Self {
            data,
            width,
            height,
        }
    }

    pub fn set(&mut self, row: usize, col: usize, value: T) {
        self.data[row * self.width + col] = value;
    }
}

impl<T: Copy> Grid for VecGrid<T> {
    type Cell = T;

    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn get(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.data.get(row * self.width + col).copied()
    }
}

pub type SyntheticEye = EyeAssets<VecGrid<u16>, VecGrid<u8>>;

pub const SCREEN: usize = 8;
pub const SCLERA: usize = 12;
pub const IRIS: usize = 8;
pub const IRIS_MAP_W: usize = 8;
pub const IRIS_MAP_H: usize = 4;

/// Sclera cells carry bit 15 plus their coordinates
pub fn sclera_color(x: usize, y: usize) -> u16 {
    0x8000 | ((y as u16) << 6) | x as u16
}

/// Iris cells carry bit 14 plus their (row, col)
pub fn iris_color(row: usize, col: usize) -> u16 {
    0x4000 | ((row as u16) << 6) | col as u16
}

/// Polar code for an iris-local coordinate: distance grows away from the
/// center, angle grows with the column
pub fn polar_code(x: usize, y: usize) -> u16 {
    let dx = 2 * x as i32 - (IRIS as i32 - 1);
    let dy = 2 * y as i32 - (IRIS as i32 - 1);
    let d2 = (dx * dx + dy * dy) as u32;
    let distance = (d2 * 127 / 98).min(127) as u16;
    let angle = (x as u16 * 64) % 512;
    (angle << 7) | distance
}

/// A 8x8 screen over a 12x12 sclera with an 8x8 polar map, eyelids open
pub fn synthetic_eye() -> SyntheticEye {
    synthetic_eye_with_lids(VecGrid::filled(SCREEN, SCREEN, 255), VecGrid::filled(SCREEN, SCREEN, 255))
}

pub fn synthetic_eye_with_lids(upper: VecGrid<u8>, lower: VecGrid<u8>) -> SyntheticEye {
    let sclera = VecGrid::from_fn(SCLERA, SCLERA, |row, col| sclera_color(col, row));
    let iris = VecGrid::from_fn(IRIS_MAP_W, IRIS_MAP_H, iris_color);
    let polar = VecGrid::from_fn(IRIS, IRIS, |row, col| polar_code(col, row));
    EyeAssets::new(sclera, iris, polar, upper, lower).unwrap()
}

/// Error raised by [`RecordingSink`] when told to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SinkFault;

/// Display that records every call and keeps a framebuffer
pub struct RecordingSink {
    pub width: u16,
    pub height: u16,
    pub windows: Vec<(u16, u16, u16, u16)>,
    pub pixels: Vec<Rgb565>,
    pub batches: usize,
    pub frame: Vec<Rgb565>,
    pub rotation: Rotation,
    pub mirror: bool,
    /// Fail the pixel write after this many pixels have been accepted
    pub fail_after: Option<usize>,
    cursor: (u16, u16),
    window: (u16, u16, u16, u16),
}

impl RecordingSink {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            width,
            height,
            windows: Vec::new(),
            pixels: Vec::new(),
            batches: 0,
            frame: vec![Rgb565::BLACK; width as usize * height as usize],
            rotation: Rotation::Deg0,
            mirror: false,
            fail_after: None,
            cursor: (0, 0),
            window: (0, 0, 0, 0),
        }
    }

    pub fn pixel_at(&self, x: u16, y: u16) -> Option<Rgb565> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.frame.get(y as usize * self.width as usize + x as usize).copied()
    }

    pub fn clear_log(&mut self) {
        self.windows.clear();
        self.pixels.clear();
        self.batches = 0;
    }
}

impl DisplaySink for RecordingSink {
    type Error = SinkFault;

    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), SinkFault> {
        self.windows.push((x0, y0, x1, y1));
        self.window = (x0, y0, x1, y1);
        self.cursor = (x0, y0);
        Ok(())
    }

    fn write_pixel(&mut self, color: Rgb565) -> Result<(), SinkFault> {
        if let Some(limit) = self.fail_after {
            if self.pixels.len() >= limit {
                return Err(SinkFault);
            }
        }
        self.pixels.push(color);
        let (x, y) = self.cursor;
        let idx = y as usize * self.width as usize + x as usize;
        if let Some(slot) = self.frame.get_mut(idx) {
            *slot = color;
        }
        let (x0, y0, x1, y1) = self.window;
        self.cursor = if x >= x1 {
            (x0, if y >= y1 { y0 } else { y + 1 })
        } else {
            (x + 1, y)
        };
        Ok(())
    }

    fn write_pixels(&mut self, colors: &[Rgb565]) -> Result<(), SinkFault> {
        self.batches += 1;
        for &c in colors {
            self.write_pixel(c)?;
        }
        Ok(())
    }

    fn set_orientation(&mut self, rotation: Rotation) -> Result<(), SinkFault> {
        self.rotation = rotation;
        Ok(())
    }

    fn set_mirror(&mut self, enabled: bool) -> Result<(), SinkFault> {
        self.mirror = enabled;
        Ok(())
    }

    fn width(&self) -> u16 {
        self.width
    }

    fn height(&self) -> u16 {
        self.height
    }
}

/// Random source that replays a fixed script, then yields the midpoint
/// of each requested bound
pub struct ScriptedRng {
    values: VecDeque<u32>,
    pub requests: Vec<u32>,
}

impl ScriptedRng {
    pub fn new(values: &[u32]) -> Self {
        Self {
            values: values.iter().copied().collect(),
            requests: Vec::new(),
        }
    }
}

impl RandomSource for ScriptedRng {
    fn below(&mut self, bound: u32) -> u32 {
        self.requests.push(bound);
        if bound == 0 {
            return 0;
        }
        self.values.pop_front().unwrap_or(bound / 2) % bound
    }
}

/// Clock advanced by hand
#[derive(Default)]
pub struct SteppingClock {
    now: Cell<u64>,
}

impl SteppingClock {
    pub fn at(us: u64) -> Self {
        Self { now: Cell::new(us) }
    }

    pub fn set(&self, us: u64) {
        self.now.set(us);
    }

    pub fn advance(&self, us: u64) {
        self.now.set(self.now.get() + us);
    }
}

impl Clock for SteppingClock {
    fn now_us(&self) -> u64 {
        self.now.get()
    }
}
