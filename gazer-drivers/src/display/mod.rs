//! Display drivers

pub mod shared;
pub mod ssd1351;

pub use shared::SharedPin;
pub use ssd1351::{Ssd1351, Ssd1351Error};
