//! Eyelid blinks
//!
//! Each eye carries its own [`BlinkState`]; a single [`BlinkTimer`] decides
//! when a new blink starts for every eye that is not already mid-blink.

use crate::traits::RandomSource;

/// Shortest blink close time, microseconds
pub const BLINK_MIN_US: u32 = 36_000;
/// Spread added to [`BLINK_MIN_US`]
pub const BLINK_SPREAD_US: u32 = 36_000;
/// Upper bound (exclusive) on the random part of the blink interval
pub const BLINK_INTERVAL_SPREAD_US: u32 = 4_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BlinkPhase {
    #[default]
    Idle,
    /// Lids moving shut
    Closing,
    /// Lids reopening at half speed
    Opening,
}

/// Blink progress for one eye
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkState {
    pub phase: BlinkPhase,
    pub start_us: u64,
    pub duration_us: u64,
}

impl BlinkState {
    pub const fn new() -> Self {
        Self {
            phase: BlinkPhase::Idle,
            start_us: 0,
            duration_us: 0,
        }
    }

    pub fn is_blinking(&self) -> bool {
        self.phase != BlinkPhase::Idle
    }

    /// Start closing, unless a blink is already under way
    ///
    /// Returns whether a blink was started.
    pub fn begin(&mut self, now_us: u64, duration_us: u64) -> bool {
        if self.is_blinking() {
            return false;
        }
        self.phase = BlinkPhase::Closing;
        self.start_us = now_us;
        self.duration_us = duration_us;
        true
    }

    /// Move to the next phase once the current one has run its course
    pub fn advance(&mut self, now_us: u64) {
        if !self.is_blinking() {
            return;
        }
        if now_us.saturating_sub(self.start_us) < self.duration_us {
            return;
        }
        match self.phase {
            BlinkPhase::Closing => {
                self.phase = BlinkPhase::Opening;
                self.duration_us *= 2;
                self.start_us = now_us;
            }
            BlinkPhase::Opening | BlinkPhase::Idle => {
                self.phase = BlinkPhase::Idle;
            }
        }
    }

    /// Pull a pair of eyelid thresholds toward fully closed by the
    /// current blink progress
    ///
    /// Idle eyes return the thresholds unchanged.
    pub fn blend(&self, now_us: u64, upper: u8, lower: u8) -> (u8, u8) {
        let s = match self.phase {
            BlinkPhase::Idle => return (upper, lower),
            phase => {
                let elapsed = now_us.saturating_sub(self.start_us);
                let s = if elapsed >= self.duration_us {
                    255
                } else {
                    (255 * elapsed / self.duration_us) as u32
                };
                if phase == BlinkPhase::Opening {
                    1 + s
                } else {
                    256 - s
                }
            }
        };
        (mix(upper, s), mix(lower, s))
    }
}

#[inline]
fn mix(t: u8, s: u32) -> u8 {
    ((t as u32 * s + 254 * (257 - s)) / 256) as u8
}

/// Shared autonomous blink schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BlinkTimer {
    last_us: u64,
    next_in_us: u64,
}

impl BlinkTimer {
    /// Both fields at zero, so the first poll fires
    pub const fn new() -> Self {
        Self {
            last_us: 0,
            next_in_us: 0,
        }
    }

    /// Check the schedule; returns the shared close duration when a blink
    /// is due and reschedules the next one
    pub fn poll(&mut self, now_us: u64, rng: &mut impl RandomSource) -> Option<u64> {
        if now_us.saturating_sub(self.last_us) < self.next_in_us {
            return None;
        }
        self.last_us = now_us;
        let duration = (rng.below(BLINK_SPREAD_US) + BLINK_MIN_US) as u64;
        self.next_in_us = duration * 3 + rng.below(BLINK_INTERVAL_SPREAD_US) as u64;
        Some(duration)
    }
}
