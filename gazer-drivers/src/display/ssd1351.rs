//! SSD1351 OLED Display Driver
//!
//! Driver for 128x128 SSD1351-based color OLED displays via SPI.
//! Pixels are 16-bit 5-6-5 RGB, sent high byte first.
//!
//! Chip select is owned by the `SpiDevice`; the data/command line and the
//! optional reset line are plain output pins. Two panels may share one bus
//! and one DC line (see [`SharedPin`](super::SharedPin)); only one of them
//! should own the reset line.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

use gazer_core::traits::{DisplaySink, Rotation};
use gazer_core::Rgb565;

/// Panel dimensions
pub const WIDTH: u16 = 128;
pub const HEIGHT: u16 = 128;

/// Reset pulse phase length
const RESET_PULSE_MS: u32 = 50;

/// Pixels per SPI transfer
const CHUNK_PIXELS: usize = 64;

/// SSD1351 commands
#[allow(dead_code)]
mod cmd {
    pub const SET_COLUMN: u8 = 0x15;
    pub const SET_ROW: u8 = 0x75;
    pub const WRITE_RAM: u8 = 0x5C;
    pub const SET_REMAP: u8 = 0xA0;
    pub const START_LINE: u8 = 0xA1;
    pub const DISPLAY_OFFSET: u8 = 0xA2;
    pub const NORMAL_DISPLAY: u8 = 0xA6;
    pub const INVERT_DISPLAY: u8 = 0xA7;
    pub const FUNCTION_SELECT: u8 = 0xAB;
    pub const DISPLAY_OFF: u8 = 0xAE;
    pub const DISPLAY_ON: u8 = 0xAF;
    pub const PRECHARGE: u8 = 0xB1;
    pub const CLOCK_DIV: u8 = 0xB3;
    pub const SET_VSL: u8 = 0xB4;
    pub const SET_GPIO: u8 = 0xB5;
    pub const PRECHARGE2: u8 = 0xB6;
    pub const VCOMH: u8 = 0xBE;
    pub const CONTRAST_ABC: u8 = 0xC1;
    pub const CONTRAST_MASTER: u8 = 0xC7;
    pub const MUX_RATIO: u8 = 0xCA;
    pub const COMMAND_LOCK: u8 = 0xFD;
}

/// Bring-up sequence: (command, arguments, delay after in ms)
const INIT_SEQUENCE: &[(u8, &[u8], u32)] = &[
    (cmd::COMMAND_LOCK, &[0x12], 0),
    (cmd::COMMAND_LOCK, &[0xB1], 0),
    (cmd::DISPLAY_OFF, &[], 0),
    (cmd::CLOCK_DIV, &[0xF1], 0), // 7:4 oscillator, 3:0 divider
    (cmd::MUX_RATIO, &[(HEIGHT - 1) as u8], 0),
    (cmd::DISPLAY_OFFSET, &[0x00], 0),
    (cmd::SET_GPIO, &[0x00], 0),
    (cmd::FUNCTION_SELECT, &[0x01], 0), // internal VDD regulator
    (cmd::PRECHARGE, &[0x32], 0),
    (cmd::VCOMH, &[0x05], 0),
    (cmd::NORMAL_DISPLAY, &[], 0),
    (cmd::CONTRAST_ABC, &[0xC8, 0x80, 0xC8], 0),
    (cmd::CONTRAST_MASTER, &[0x0F], 0),
    (cmd::SET_VSL, &[0xA0, 0xB5, 0x55], 0),
    (cmd::PRECHARGE2, &[0x01], 0),
    (cmd::DISPLAY_ON, &[], 0),
];

// Remap register bits:
// 7:6 color depth (01 = 65k)
// 5   odd/even COM split
// 4   scan direction (1 = bottom-up)
// 2   color order (1 = C-B-A)
// 1   column remap (1 = 127-0)
// 0   address increment (1 = vertical)
const REMAP_BASE: u8 = 0b0110_0100;

const ROTATION_REMAP: [u8; 4] = [
    0b0001_0000, // bottom-up
    0b0001_0011, // bottom-up, column remap, vertical
    0b0000_0010, // column remap
    0b0000_0001, // vertical
];

const MIRROR_REMAP: [u8; 4] = [0b0111_0110, 0b0110_0111, 0b0110_0100, 0b0111_0101];

/// Remap register value for an orientation
pub const fn remap(rotation: Rotation, mirror: bool) -> u8 {
    let i = rotation.index() as usize;
    if mirror {
        MIRROR_REMAP[i]
    } else {
        REMAP_BASE | ROTATION_REMAP[i]
    }
}

/// Driver errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Ssd1351Error<SpiE, PinE> {
    /// SPI transfer failed
    Spi(SpiE),
    /// DC or reset pin failed
    Pin(PinE),
}

/// SSD1351 OLED driver
pub struct Ssd1351<SPI, DC, RST> {
    spi: SPI,
    dc: DC,
    rst: Option<RST>,
    rotation: Rotation,
    mirror: bool,
}

impl<SPI, DC, RST> Ssd1351<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin<Error = DC::Error>,
{
    /// Create a new driver; nothing is sent until [`init`](Self::init)
    pub fn new(spi: SPI, dc: DC, rst: Option<RST>) -> Self {
        Self {
            spi,
            dc,
            rst,
            rotation: Rotation::Deg0,
            mirror: false,
        }
    }

    /// Reset (if this panel owns the reset line), send the bring-up
    /// sequence and restore the current orientation
    pub fn init(&mut self, delay: &mut impl DelayNs) -> Result<(), Ssd1351Error<SPI::Error, DC::Error>> {
        if let Some(rst) = self.rst.as_mut() {
            rst.set_high().map_err(Ssd1351Error::Pin)?;
            delay.delay_ms(RESET_PULSE_MS);
            rst.set_low().map_err(Ssd1351Error::Pin)?;
            delay.delay_ms(RESET_PULSE_MS);
            rst.set_high().map_err(Ssd1351Error::Pin)?;
            delay.delay_ms(RESET_PULSE_MS);
        }

        for &(c, args, ms) in INIT_SEQUENCE {
            self.command(c, args)?;
            if ms > 0 {
                delay.delay_ms(ms);
            }
        }

        self.write_orientation()
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn is_mirrored(&self) -> bool {
        self.mirror
    }

    /// Turn the panel on or off; display RAM is kept
    pub fn set_enabled(&mut self, on: bool) -> Result<(), Ssd1351Error<SPI::Error, DC::Error>> {
        self.command(if on { cmd::DISPLAY_ON } else { cmd::DISPLAY_OFF }, &[])
    }

    /// Invert display colors
    pub fn set_inverted(&mut self, inverted: bool) -> Result<(), Ssd1351Error<SPI::Error, DC::Error>> {
        self.command(
            if inverted {
                cmd::INVERT_DISPLAY
            } else {
                cmd::NORMAL_DISPLAY
            },
            &[],
        )
    }

    /// Release the bus and pins
    pub fn release(self) -> (SPI, DC, Option<RST>) {
        (self.spi, self.dc, self.rst)
    }

    fn write_orientation(&mut self) -> Result<(), Ssd1351Error<SPI::Error, DC::Error>> {
        self.command(cmd::SET_REMAP, &[remap(self.rotation, self.mirror)])?;
        let start_line = if self.rotation.index() < 2 { HEIGHT as u8 } else { 0 };
        self.command(cmd::START_LINE, &[start_line])
    }

    /// Send a command byte with DC low, then its arguments with DC high
    fn command(&mut self, c: u8, args: &[u8]) -> Result<(), Ssd1351Error<SPI::Error, DC::Error>> {
        self.dc.set_low().map_err(Ssd1351Error::Pin)?;
        self.spi.write(&[c]).map_err(Ssd1351Error::Spi)?;
        if !args.is_empty() {
            self.data(args)?;
        }
        Ok(())
    }

    fn data(&mut self, bytes: &[u8]) -> Result<(), Ssd1351Error<SPI::Error, DC::Error>> {
        self.dc.set_high().map_err(Ssd1351Error::Pin)?;
        self.spi.write(bytes).map_err(Ssd1351Error::Spi)
    }
}

impl<SPI, DC, RST> DisplaySink for Ssd1351<SPI, DC, RST>
where
    SPI: SpiDevice,
    DC: OutputPin,
    RST: OutputPin<Error = DC::Error>,
{
    type Error = Ssd1351Error<SPI::Error, DC::Error>;

    fn set_window(&mut self, x0: u16, y0: u16, x1: u16, y1: u16) -> Result<(), Self::Error> {
        // Vertical address increment: columns and rows trade places
        let (x0, y0, x1, y1) = if self.rotation.is_transposed() {
            (y0, x0, y1, x1)
        } else {
            (x0, y0, x1, y1)
        };
        self.command(cmd::SET_COLUMN, &[x0 as u8, x1 as u8])?;
        self.command(cmd::SET_ROW, &[y0 as u8, y1 as u8])?;
        self.command(cmd::WRITE_RAM, &[])
    }

    fn write_pixel(&mut self, color: Rgb565) -> Result<(), Self::Error> {
        self.data(&color.to_be_bytes())
    }

    fn write_pixels(&mut self, colors: &[Rgb565]) -> Result<(), Self::Error> {
        let mut buf = [0u8; CHUNK_PIXELS * 2];
        for chunk in colors.chunks(CHUNK_PIXELS) {
            for (dst, c) in buf.chunks_exact_mut(2).zip(chunk) {
                dst.copy_from_slice(&c.to_be_bytes());
            }
            self.data(&buf[..chunk.len() * 2])?;
        }
        Ok(())
    }

    fn set_orientation(&mut self, rotation: Rotation) -> Result<(), Self::Error> {
        self.rotation = rotation;
        self.write_orientation()
    }

    fn set_mirror(&mut self, enabled: bool) -> Result<(), Self::Error> {
        self.mirror = enabled;
        self.command(cmd::SET_REMAP, &[remap(self.rotation, self.mirror)])
    }

    fn width(&self) -> u16 {
        if self.rotation.is_transposed() {
            HEIGHT
        } else {
            WIDTH
        }
    }

    fn height(&self) -> u16 {
        if self.rotation.is_transposed() {
            WIDTH
        } else {
            HEIGHT
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use gazer_core::traits::DisplayExt;

    type TestPanel = Ssd1351<MockSpi, MockPin, MockPin>;

    fn panel(log: &Log, with_reset: bool) -> TestPanel {
        let rst = with_reset.then(|| MockPin::new(log, PinRole::Rst));
        Ssd1351::new(MockSpi::new(log), MockPin::new(log, PinRole::Dc), rst)
    }

    #[test]
    fn test_init_sequence() {
        let log = new_log();
        let mut display = panel(&log, true);
        display.init(&mut MockDelay::new(&log)).unwrap();

        let events = log.borrow();
        assert_eq!(
            &events[..6],
            &[
                Event::Rst(true),
                Event::DelayMs(50),
                Event::Rst(false),
                Event::DelayMs(50),
                Event::Rst(true),
                Event::DelayMs(50),
            ]
        );
        drop(events);

        let cmds = commands(&log);
        assert_eq!(cmds.len(), INIT_SEQUENCE.len() + 2);
        assert_eq!(cmds[0], (0xFD, vec![0x12]));
        assert_eq!(cmds[4], (0xCA, vec![127]));
        assert_eq!(cmds[11], (0xC1, vec![0xC8, 0x80, 0xC8]));
        assert_eq!(cmds[15], (0xAF, vec![]));
        assert_eq!(cmds[16], (0xA0, vec![0b0111_0100]));
        assert_eq!(cmds[17], (0xA1, vec![128]));
    }

    #[test]
    fn test_init_without_reset_line() {
        let log = new_log();
        let mut display = panel(&log, false);
        display.init(&mut MockDelay::new(&log)).unwrap();

        assert!(!log
            .borrow()
            .iter()
            .any(|e| matches!(e, Event::Rst(_) | Event::DelayMs(_))));
        assert_eq!(commands(&log)[0].0, 0xFD);
    }

    #[test]
    fn test_rotation_remap_and_start_line() {
        let log = new_log();
        let mut display = panel(&log, false);

        display.set_orientation(Rotation::Deg270).unwrap();
        assert_eq!(
            commands(&log),
            vec![(0xA0, vec![0b0110_0101]), (0xA1, vec![0])]
        );
        assert_eq!(display.rotation(), Rotation::Deg270);
    }

    #[test]
    fn test_mirror_uses_own_table() {
        let log = new_log();
        let mut display = panel(&log, false);
        display.set_orientation(Rotation::Deg90).unwrap();
        log.borrow_mut().clear();

        display.set_mirror(true).unwrap();
        display.set_mirror(false).unwrap();
        assert_eq!(
            commands(&log),
            vec![(0xA0, vec![0b0110_0111]), (0xA0, vec![0b0111_0111])]
        );
        assert!(!display.is_mirrored());
    }

    #[test]
    fn test_mirror_survives_rotation() {
        let log = new_log();
        let mut display = panel(&log, false);
        display.set_mirror(true).unwrap();
        log.borrow_mut().clear();

        display.set_orientation(Rotation::Deg180).unwrap();
        assert_eq!(commands(&log)[0], (0xA0, vec![MIRROR_REMAP[2]]));
    }

    #[test]
    fn test_window_swapped_when_transposed() {
        let log = new_log();
        let mut display = panel(&log, false);

        display.set_window(1, 2, 3, 4).unwrap();
        display.set_orientation(Rotation::Deg90).unwrap();
        log.borrow_mut().clear();
        display.set_window(1, 2, 3, 4).unwrap();

        assert_eq!(
            commands(&log),
            vec![(0x15, vec![2, 4]), (0x75, vec![1, 3]), (0x5C, vec![])]
        );
    }

    #[test]
    fn test_pixels_high_byte_first_in_chunks() {
        let log = new_log();
        let mut display = panel(&log, false);
        let pixels = [Rgb565(0x1234); 100];

        display.write_pixels(&pixels).unwrap();

        let events = log.borrow();
        let writes: Vec<&Vec<u8>> = events
            .iter()
            .filter_map(|e| match e {
                Event::Write(b) => Some(b),
                _ => None,
            })
            .collect();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].len(), 128);
        assert_eq!(writes[1].len(), 72);
        assert_eq!(&writes[0][..4], &[0x12, 0x34, 0x12, 0x34]);
        assert!(events.iter().all(|e| !matches!(e, Event::Dc(false))));
    }

    #[test]
    fn test_fill_rect_through_ext() {
        let log = new_log();
        let mut display = panel(&log, false);

        display.fill_rect(120, 120, 20, 20, Rgb565::RED).unwrap();

        let cmds = commands(&log);
        assert_eq!(cmds[0], (0x15, vec![120, 127]));
        assert_eq!(cmds[1], (0x75, vec![120, 127]));
        // 8x8 clipped pixels follow the write command
        assert_eq!(cmds[2].0, 0x5C);
        assert_eq!(cmds[2].1.len(), 64 * 2);
        assert_eq!(&cmds[2].1[..2], &[0xF8, 0x00]);
    }

    #[test]
    fn test_enable_and_invert() {
        let log = new_log();
        let mut display = panel(&log, false);

        display.set_enabled(false).unwrap();
        display.set_enabled(true).unwrap();
        display.set_inverted(true).unwrap();
        display.set_inverted(false).unwrap();

        let ops: Vec<u8> = commands(&log).iter().map(|c| c.0).collect();
        assert_eq!(ops, vec![0xAE, 0xAF, 0xA7, 0xA6]);
    }

    #[test]
    fn test_errors_are_tagged() {
        let log = new_log();
        let mut display = panel(&log, false);
        let (mut spi, dc, rst) = panel(&log, false).release();
        spi.fail = true;
        let mut failing_spi: TestPanel = Ssd1351::new(spi, dc, rst);
        assert_eq!(
            failing_spi.write_pixel(Rgb565::WHITE),
            Err(Ssd1351Error::Spi(BusFault))
        );

        let (spi, mut dc, rst) = panel(&log, false).release();
        dc.fail = true;
        let mut failing_pin: TestPanel = Ssd1351::new(spi, dc, rst);
        assert_eq!(
            failing_pin.set_window(0, 0, 1, 1),
            Err(Ssd1351Error::Pin(BusFault))
        );

        assert!(display.write_pixel(Rgb565::WHITE).is_ok());
    }

    #[test]
    fn test_logical_size() {
        let log = new_log();
        let mut display = panel(&log, false);
        assert_eq!((display.width(), display.height()), (128, 128));
        display.set_orientation(Rotation::Deg90).unwrap();
        assert_eq!((display.width(), display.height()), (HEIGHT, WIDTH));
    }
}
