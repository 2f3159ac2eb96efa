//! Autonomous iris motion
//!
//! Each cycle picks a new target scale and reaches it over a fixed time.
//! The path is split in half repeatedly, with each midpoint nudged by a
//! random amount that shrinks with every split, so the iris makes one large
//! movement overlaid with smaller jitters. Segments wait on an explicit
//! stack and are pulled one frame at a time.

use heapless::Vec;

use super::{IrisRange, IrisSource};
use crate::traits::RandomSource;

/// Default length of one top-level cycle
pub const DEFAULT_CYCLE_US: u64 = 10_000_000;

/// Splitting stops once the allowed range drops below this
const MIN_SPLIT_RANGE: i32 = 8;

/// Enough for a full 0..=1023 range split down to single leaves
const STACK_DEPTH: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
struct Segment {
    start_value: i32,
    end_value: i32,
    start_us: u64,
    duration_us: u64,
    range: i32,
}

impl Segment {
    fn value_at(&self, elapsed_us: u64) -> i64 {
        let delta = (self.end_value - self.start_value) as i64;
        self.start_value as i64 + delta * elapsed_us as i64 / self.duration_us as i64
    }
}

pub struct FractalIris {
    range: IrisRange,
    cycle_us: u64,
    previous_end: i32,
    stack: Vec<Segment, STACK_DEPTH>,
    leaf: Option<Segment>,
}

impl FractalIris {
    pub fn new(range: IrisRange, cycle_us: u64) -> Self {
        Self {
            range,
            cycle_us: cycle_us.max(1),
            previous_end: range.center() as i32,
            stack: Vec::new(),
            leaf: None,
        }
    }

    /// Scale the current cycle started from, or is heading to once it ends
    pub fn previous_end(&self) -> u16 {
        self.previous_end as u16
    }

    fn start_cycle(&mut self, now_us: u64, rng: &mut impl RandomSource) {
        let span = self.range.span() as u32;
        let end = (rng.below(span) + self.range.min as u32) as i32;
        self.stack.clear();
        // The stack is empty here, so this cannot fail
        let _ = self.stack.push(Segment {
            start_value: self.previous_end,
            end_value: end,
            start_us: now_us,
            duration_us: self.cycle_us,
            range: span as i32,
        });
        self.previous_end = end;
    }

    /// Split `seg` or make it the active leaf
    fn expand(&mut self, seg: Segment, rng: &mut impl RandomSource) {
        if seg.range < MIN_SPLIT_RANGE || self.stack.len() + 2 > STACK_DEPTH {
            self.leaf = Some(seg);
            return;
        }

        let range = seg.range / 2;
        let duration_us = seg.duration_us / 2;
        let mid = (seg.start_value + seg.end_value - range) / 2 + rng.below(range as u32) as i32;

        let first = Segment {
            start_value: seg.start_value,
            end_value: mid,
            start_us: seg.start_us,
            duration_us,
            range,
        };
        let second = Segment {
            start_value: mid,
            end_value: seg.end_value,
            start_us: seg.start_us + duration_us,
            duration_us,
            range,
        };
        // Capacity checked above
        let _ = self.stack.push(second);
        let _ = self.stack.push(first);
    }
}

impl IrisSource for FractalIris {
    fn next_scale(&mut self, now_us: u64, rng: &mut impl RandomSource) -> u16 {
        let mut cycles_started = 0;
        loop {
            if let Some(leaf) = self.leaf {
                let elapsed = now_us.saturating_sub(leaf.start_us);
                if elapsed < leaf.duration_us {
                    return self.range.clip(leaf.value_at(elapsed) as i32);
                }
                self.leaf = None;
            }

            match self.stack.pop() {
                Some(seg) => self.expand(seg, &mut *rng),
                None => {
                    // A cycle too short to yield a single frame; hold still
                    if cycles_started > 0 {
                        return self.range.clip(self.previous_end);
                    }
                    self.start_cycle(now_us, &mut *rng);
                    cycles_started += 1;
                }
            }
        }
    }
}
