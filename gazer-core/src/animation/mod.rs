//! Eye animation
//!
//! Gaze, blinks and eyelid tracking, advanced once per frame by
//! [`AnimationState::tick`].

pub mod blink;
pub mod ease;
pub mod eyelid;
pub mod gaze;
pub mod state;

pub use blink::{BlinkPhase, BlinkState, BlinkTimer};
pub use ease::EASE;
pub use eyelid::EyelidTracker;
pub use gaze::GazeState;
pub use state::{AnimationError, AnimationOptions, AnimationState, EyeAnimation, GazeCalibration, MAX_EYES};

pub use crate::compositor::DrawParams;
