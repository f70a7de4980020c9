//! Exact integer time base for scheduling.
//!
//! One tick is 1/705,600,000 s. That rate is a common multiple of every
//! standard audio sample rate, so a frame count at 8k..192k converts to ticks
//! with no remainder and placements can be compared exactly.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

/// Ticks per second.
pub const TICKS_PER_SECOND: u64 = 705_600_000;

/// A non-negative point or span on the timeline, in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct Ticks(u64);

impl Ticks {
    pub const ZERO: Ticks = Ticks(0);

    pub const fn new(ticks: u64) -> Self {
        Ticks(ticks)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// Nearest tick to `secs`. Negative or non-finite input yields `None`.
    pub fn from_secs_f64(secs: f64) -> Option<Self> {
        if !secs.is_finite() || secs < 0.0 {
            return None;
        }
        let ticks = (secs * TICKS_PER_SECOND as f64).round();
        if ticks > u64::MAX as f64 {
            return None;
        }
        Some(Ticks(ticks as u64))
    }

    pub fn from_millis(ms: u64) -> Self {
        Ticks(ms.saturating_mul(TICKS_PER_SECOND / 1000))
    }

    /// Span covered by `frames` at `sample_rate`, rounded up to a whole tick.
    ///
    /// Exact for every rate that divides [`TICKS_PER_SECOND`]; for other rates
    /// rounding up keeps placements from overlapping.
    pub fn from_frames(frames: u64, sample_rate: u32) -> Self {
        if sample_rate == 0 {
            return Ticks::ZERO;
        }
        let numerator = frames as u128 * TICKS_PER_SECOND as u128;
        let ticks = numerator.div_ceil(sample_rate as u128);
        Ticks(u64::try_from(ticks).unwrap_or(u64::MAX))
    }

    /// First frame index at `sample_rate` that starts at or after this tick.
    pub fn to_frame_ceil(self, sample_rate: u32) -> u64 {
        let numerator = self.0 as u128 * sample_rate as u128;
        let frames = numerator.div_ceil(TICKS_PER_SECOND as u128);
        u64::try_from(frames).unwrap_or(u64::MAX)
    }

    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / TICKS_PER_SECOND as f64
    }

    pub fn saturating_sub(self, other: Ticks) -> Ticks {
        Ticks(self.0.saturating_sub(other.0))
    }
}

impl Add for Ticks {
    type Output = Ticks;

    fn add(self, rhs: Ticks) -> Ticks {
        Ticks(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Ticks {
    type Output = Ticks;

    fn sub(self, rhs: Ticks) -> Ticks {
        self.saturating_sub(rhs)
    }
}

impl fmt::Display for Ticks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.as_secs_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_rates_divide_tick_base() {
        for rate in [
            8000u64, 11025, 16000, 22050, 24000, 32000, 44100, 48000, 88200, 96000, 176400, 192000,
        ] {
            assert_eq!(TICKS_PER_SECOND % rate, 0, "rate {} does not divide", rate);
        }
    }

    #[test]
    fn one_second_of_frames_is_one_second() {
        assert_eq!(
            Ticks::from_frames(44100, 44100),
            Ticks::new(TICKS_PER_SECOND)
        );
        assert_eq!(
            Ticks::from_frames(24000, 24000),
            Ticks::from_secs_f64(1.0).unwrap()
        );
    }

    #[test]
    fn frames_at_uncommon_rate_round_up() {
        // 1 frame at 7 Hz is 100,800,000 ticks exactly; 1 frame at 13 Hz is not exact
        assert_eq!(Ticks::from_frames(1, 7).get(), 100_800_000);
        let t = Ticks::from_frames(1, 13);
        assert!(t.get() * 13 >= TICKS_PER_SECOND);
        assert!((t.get() - 1) * 13 < TICKS_PER_SECOND);
    }

    #[test]
    fn zero_rate_is_zero_span() {
        assert_eq!(Ticks::from_frames(100, 0), Ticks::ZERO);
    }

    #[test]
    fn secs_conversion_rejects_negative_and_nan() {
        assert_eq!(Ticks::from_secs_f64(-0.5), None);
        assert_eq!(Ticks::from_secs_f64(f64::NAN), None);
        assert_eq!(Ticks::from_secs_f64(f64::INFINITY), None);
        assert_eq!(Ticks::from_secs_f64(0.0), Some(Ticks::ZERO));
    }

    #[test]
    fn frame_ceil_is_exact_on_grid() {
        let three_secs = Ticks::from_secs_f64(3.0).unwrap();
        assert_eq!(three_secs.to_frame_ceil(24000), 72000);
        // One tick past a frame boundary moves to the next frame
        assert_eq!((three_secs + Ticks::new(1)).to_frame_ceil(24000), 72001);
    }

    #[test]
    fn millis_conversion() {
        assert_eq!(Ticks::from_millis(50), Ticks::from_secs_f64(0.05).unwrap());
    }

    #[test]
    fn arithmetic_saturates() {
        assert_eq!(Ticks::new(5) - Ticks::new(10), Ticks::ZERO);
        assert_eq!(Ticks::new(u64::MAX) + Ticks::new(1), Ticks::new(u64::MAX));
    }

    #[test]
    fn display_in_seconds() {
        assert_eq!(Ticks::from_secs_f64(1.5).unwrap().to_string(), "1.500s");
    }
}
