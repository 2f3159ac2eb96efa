//! Gazer - Animated Eye Firmware
//!
//! Drives one or two SSD1351 OLED eyes from an RP2040. Each pass of the
//! main loop advances the shared gaze, blink and iris state and redraws
//! one eye; with two eyes they take turns.
//!
//! Wiring (SPI0):
//! - SCK GPIO18, MOSI GPIO19
//! - DC GPIO20 (shared), RST GPIO21 (shared, driven by the first eye)
//! - CS GPIO17 (first eye), GPIO22 (second eye)
//! - Photocell on GPIO26 (ADC0)

#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{self, Adc, Channel};
use embassy_rp::gpio::{Level, Output, Pull};
use embassy_rp::spi::{self, Spi};
use embassy_time::{Delay, Instant, Timer};
use embedded_hal_bus::spi::RefCellDevice;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use {defmt_rtt as _, panic_probe as _};

use gazer_core::config::IrisMode;
use gazer_core::iris::{FractalIris, IrisDriver, LightIris};
use gazer_core::rig::EyeRig;
use gazer_core::traits::RngSource;
use gazer_drivers::display::{SharedPin, Ssd1351};
use gazer_drivers::sensor::Photocell;

use crate::board::{noise_seed, BlockingAdc, EmbassyClock};

mod assets;
mod board;
mod config;

/// How long the orientation card stays up
const SPLASH_SECS: u64 = 2;

/// Conversions averaged per light reading
const LIGHT_OVERSAMPLE: u8 = 4;

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Gazer firmware starting...");

    // Initialize RP2040 peripherals
    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    let config = config::load_embedded();
    if config.display.width as usize != assets::SCREEN_WIDTH
        || config.display.height as usize != assets::SCREEN_HEIGHT
    {
        warn!(
            "Config screen {}x{} differs from eye art {}x{}; art wins",
            config.display.width,
            config.display.height,
            assets::SCREEN_WIDTH,
            assets::SCREEN_HEIGHT
        );
    }

    // ADC: seed from temperature sensor noise, then keep the photocell
    let mut adc = Adc::new_blocking(p.ADC, adc::Config::default());
    let mut temp = Channel::new_temp_sensor(p.ADC_TEMP_SENSOR);
    let seed = noise_seed(&mut adc, &mut temp);
    let mut rng = RngSource(SmallRng::seed_from_u64(seed));
    debug!("RNG seed {=u64:x}", seed);

    let light = Channel::new_pin(p.PIN_26, Pull::None);
    let photocell = Photocell::with_oversample(BlockingAdc::new(adc, light), LIGHT_OVERSAMPLE);

    // SPI bus shared by both panels, one CS each, common DC and reset
    let mut spi_config = spi::Config::default();
    spi_config.frequency = config.display.spi_frequency;
    let bus = RefCell::new(Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config));
    let dc = RefCell::new(Output::new(p.PIN_20, Level::High));
    let rst = Output::new(p.PIN_21, Level::High);

    let first = RefCellDevice::new(&bus, Output::new(p.PIN_17, Level::High), Delay).unwrap();
    let second = RefCellDevice::new(&bus, Output::new(p.PIN_22, Level::High), Delay).unwrap();

    let mut panels = [
        Ssd1351::new(first, SharedPin::new(&dc), Some(rst)),
        Ssd1351::new(second, SharedPin::new(&dc), None),
    ];

    // First panel pulses the shared reset line, so it goes first
    for (i, panel) in panels.iter_mut().enumerate() {
        if let Err(e) = panel.init(&mut Delay) {
            error!("Display {} init failed: {:?}", i, Debug2Format(&e));
        }
    }
    info!("Displays initialized");

    let assets = match assets::eye_assets() {
        Ok(assets) => assets,
        Err(e) => defmt::panic!("Eye art rejected: {}", e),
    };

    let range = config.animation.iris_range();
    let iris = match config.iris.mode {
        IrisMode::LightSensor => {
            IrisDriver::Light(LightIris::new(photocell, config.light_sensor.response(), range))
        }
        IrisMode::Autonomous => IrisDriver::Fractal(FractalIris::new(range, config.iris.cycle_us as u64)),
    };

    let eye_count = config.eyes.len();
    let mut rig = match EyeRig::new(
        panels.into_iter().take(eye_count),
        &config.mounts(),
        assets,
        config.animation.options(),
        iris,
        Instant::now().as_millis(),
    ) {
        Ok(rig) => rig,
        Err(e) => defmt::panic!("Eye setup failed: {:?}", Debug2Format(&e)),
    };

    if let Err(e) = rig.configure_displays() {
        error!("Display orientation failed: {:?}", Debug2Format(&e));
    }
    if let Err(e) = rig.show_splash() {
        error!("Splash failed: {:?}", Debug2Format(&e));
    }
    Timer::after_secs(SPLASH_SECS).await;

    info!("Running {} eye(s)", eye_count);

    let clock = EmbassyClock;
    let max_failures = config.display.max_failures.max(1);
    let mut failures: u8 = 0;

    loop {
        match rig.run_frame(&clock, &mut rng) {
            Ok(report) => {
                failures = 0;
                if let Some(fps) = report.fps {
                    info!("{} fps", fps);
                }
            }
            Err(e) => {
                failures = failures.saturating_add(1);
                warn!("Frame failed ({}): {:?}", failures, Debug2Format(&e));

                if failures >= max_failures {
                    warn!("Re-initializing displays");
                    for eye in 0..rig.eye_count() {
                        if let Some(panel) = rig.display_mut(eye) {
                            if let Err(e) = panel.init(&mut Delay) {
                                error!("Display {} init failed: {:?}", eye, Debug2Format(&e));
                            }
                        }
                    }
                    failures = 0;
                }
            }
        }
    }
}
