//! Hardware abstraction traits
//!
//! These traits define the interface between the animation core
//! and hardware-specific implementations.

pub mod clock;
pub mod display;
pub mod random;
pub mod sensor;

pub use clock::Clock;
pub use display::{DisplayExt, DisplaySink, Rotation};
pub use random::{RandomSource, RngSource};
pub use sensor::{LightSensor, SensorError};
