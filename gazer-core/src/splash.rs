//! Startup orientation card
//!
//! Drawn once per display at boot: an arrow pointing at the top edge and
//! one bar per eye index, so a rotated or swapped panel is obvious before
//! the eyes start moving.

use crate::color::Rgb565;
use crate::traits::{DisplayExt, DisplaySink};

/// 16x16 upward arrow, one bit per pixel, MSB first
#[rustfmt::skip]
const ARROW: [u8; 32] = [
    0b0000_0001, 0b1000_0000,
    0b0000_0011, 0b1100_0000,
    0b0000_0111, 0b1110_0000,
    0b0000_1111, 0b1111_0000,
    0b0001_1111, 0b1111_1000,
    0b0011_1111, 0b1111_1100,
    0b0111_1111, 0b1111_1110,
    0b1111_1111, 0b1111_1111,
    0b0000_0111, 0b1110_0000,
    0b0000_0111, 0b1110_0000,
    0b0000_0111, 0b1110_0000,
    0b0000_0111, 0b1110_0000,
    0b0000_0111, 0b1110_0000,
    0b0000_0111, 0b1110_0000,
    0b0000_0111, 0b1110_0000,
    0b0000_0111, 0b1110_0000,
];

const ARROW_SIZE: i32 = 16;
const SCALE: i32 = 2;
const BAR_WIDTH: i32 = 6;
const BAR_HEIGHT: i32 = 16;
const BAR_GAP: i32 = 6;

/// Clear the panel and draw the orientation card for eye `index`
pub fn draw_splash<D: DisplaySink + ?Sized>(display: &mut D, index: usize) -> Result<(), D::Error> {
    let w = display.width() as i32;
    let h = display.height() as i32;

    display.fill_screen(Rgb565::BLACK)?;

    // Arrow, scaled up and centered in the upper half
    let size = ARROW_SIZE * SCALE;
    let ax = (w - size) / 2;
    let ay = h / 4 - size / 2;
    for row in 0..ARROW_SIZE {
        for col in 0..ARROW_SIZE {
            let byte = ARROW[(row * 2 + col / 8) as usize];
            if byte & (0x80 >> (col & 7)) != 0 {
                display.fill_rect(ax + col * SCALE, ay + row * SCALE, SCALE, SCALE, Rgb565::WHITE)?;
            }
        }
    }

    // Frame along the top edge
    display.draw_hline(0, 0, w, Rgb565::RED)?;

    // One bar per eye index, so eye 0 shows one bar
    let bars = index as i32 + 1;
    let total = bars * BAR_WIDTH + (bars - 1) * BAR_GAP;
    let bx = (w - total) / 2;
    let by = h * 3 / 4 - BAR_HEIGHT / 2;
    for i in 0..bars {
        display.fill_rect(bx + i * (BAR_WIDTH + BAR_GAP), by, BAR_WIDTH, BAR_HEIGHT, Rgb565::GREEN)?;
    }

    Ok(())
}

/// Same glyph drawn unscaled, for very small panels
pub fn draw_arrow<D: DisplaySink + ?Sized>(display: &mut D, x: i32, y: i32, color: Rgb565) -> Result<(), D::Error> {
    display.draw_bitmap(x, y, &ARROW, ARROW_SIZE, ARROW_SIZE, color)
}
