//! Board-agnostic core logic for the animated eye firmware
//!
//! This crate contains everything that decides what a frame looks like,
//! independent of the display controller or the MCU:
//!
//! - Hardware abstraction traits (display sink, clock, randomness, light sensor)
//! - Bitmap asset contracts (sclera, iris, polar map, eyelid maps)
//! - The per-pixel compositor
//! - The gaze/blink animation state machine
//! - Iris dilation drivers (light sensor and autonomous fractal motion)
//! - The frame loop body and the startup orientation card
//! - Configuration types and the `eyes.toml` parser

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod animation;
pub mod assets;
pub mod color;
pub mod compositor;
pub mod config;
pub mod iris;
pub mod rig;
pub mod splash;
pub mod traits;

#[cfg(test)]
pub(crate) mod testing;

pub use color::Rgb565;
