//! Hardware driver implementations
//!
//! This crate provides concrete implementations of the traits defined
//! in gazer-core for the eye hardware:
//!
//! - SSD1351 128x128 color OLED over blocking SPI
//! - Output pin sharing for displays on one data/command line
//! - Photocell light sensor on an ADC channel

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod sensor;

#[cfg(test)]
pub(crate) mod testing;
