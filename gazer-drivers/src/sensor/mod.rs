//! Analog sensors

pub mod photocell;

pub use photocell::{AdcReader, Photocell};
