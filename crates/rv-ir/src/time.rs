//! Wall-clock time values used for seeking and playing offsets.

use core::ops::{Add, Sub};

/// A signed span of time with microsecond precision.
///
/// Conversions to and from frame indices use integer arithmetic so that a
/// round trip through [`Time::to_frames`] and [`Time::from_frames`] is exact
/// whenever the frame lands on a whole microsecond.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Time {
    micros: i64,
}

impl Time {
    /// The zero offset, i.e. the beginning of a stream.
    pub const ZERO: Time = Time { micros: 0 };

    pub const fn from_micros(micros: i64) -> Self {
        Self { micros }
    }

    pub const fn from_millis(millis: i64) -> Self {
        Self {
            micros: millis * 1_000,
        }
    }

    pub fn from_secs_f32(secs: f32) -> Self {
        Self {
            micros: (secs as f64 * 1_000_000.0) as i64,
        }
    }

    pub const fn as_micros(self) -> i64 {
        self.micros
    }

    pub const fn as_millis(self) -> i64 {
        self.micros / 1_000
    }

    pub fn as_secs_f32(self) -> f32 {
        (self.micros as f64 / 1_000_000.0) as f32
    }

    /// Frame index reached after this much time at `sample_rate`.
    ///
    /// Negative times clamp to frame 0.
    pub fn to_frames(self, sample_rate: u32) -> u64 {
        if self.micros <= 0 {
            return 0;
        }
        ((self.micros as u128 * sample_rate as u128) / 1_000_000).min(u64::MAX as u128) as u64
    }

    /// Time at which `frames` frames have played at `sample_rate`.
    ///
    /// Returns [`Time::ZERO`] when the sample rate is unknown (0).
    pub fn from_frames(frames: u64, sample_rate: u32) -> Self {
        if sample_rate == 0 {
            return Self::ZERO;
        }
        Self {
            micros: ((frames as u128 * 1_000_000) / sample_rate as u128).min(i64::MAX as u128) as i64,
        }
    }
}

impl Add for Time {
    type Output = Time;

    fn add(self, rhs: Time) -> Time {
        Time::from_micros(self.micros.saturating_add(rhs.micros))
    }
}

impl Sub for Time {
    type Output = Time;

    fn sub(self, rhs: Time) -> Time {
        Time::from_micros(self.micros.saturating_sub(rhs.micros))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn time_ordering() {
        let t1 = Time::from_millis(10);
        let t2 = Time::from_millis(20);
        let t3 = Time::from_micros(15_000);

        assert!(t1 < t2);
        assert!(t1 < t3);
        assert!(t3 < t2);
    }

    #[test]
    fn to_frames() {
        assert_eq!(Time::from_millis(500).to_frames(44100), 22050);
        assert_eq!(Time::from_millis(1000).to_frames(48000), 48000);
        assert_eq!(Time::from_millis(-20).to_frames(44100), 0);
        assert_eq!(Time::from_millis(250).to_frames(0), 0);
    }

    #[test]
    fn from_frames_is_exact_on_whole_micros() {
        let t = Time::from_frames(22050, 44100);
        assert_eq!(t, Time::from_millis(500));
        assert_eq!(t.to_frames(44100), 22050);
    }

    #[test]
    fn huge_frame_counts_clamp() {
        assert_eq!(Time::from_frames(u64::MAX, 1).as_micros(), i64::MAX);
        assert_eq!(Time::from_micros(i64::MAX).to_frames(u32::MAX), u64::MAX);
    }

    #[test]
    fn from_frames_unknown_rate_is_zero() {
        assert_eq!(Time::from_frames(1000, 0), Time::ZERO);
    }

    #[test]
    fn arithmetic_saturates() {
        let t = Time::from_millis(5) + Time::from_millis(10);
        assert_eq!(t.as_millis(), 15);
        assert_eq!((t - Time::from_millis(20)).as_millis(), -5);
        assert_eq!(Time::from_micros(i64::MAX) + Time::from_micros(1), Time::from_micros(i64::MAX));
    }
}
