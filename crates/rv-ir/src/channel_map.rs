//! Channel roles and bounded channel layouts.

use arrayvec::ArrayVec;
use core::fmt;

/// Maximum number of audio channels in a layout.
pub const MAX_CHANNELS: u16 = 8;

/// The speaker role of one interleaved channel in a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SoundChannel {
    Unspecified,
    Mono,
    FrontLeft,
    FrontRight,
    FrontCenter,
    FrontLeftOfCenter,
    FrontRightOfCenter,
    LowFrequencyEffects,
    BackLeft,
    BackRight,
    BackCenter,
    SideLeft,
    SideRight,
    TopCenter,
    TopFrontLeft,
    TopFrontRight,
    TopFrontCenter,
    TopBackLeft,
    TopBackRight,
    TopBackCenter,
}

/// Returned when a layout would grow past [`MAX_CHANNELS`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelMapFull;

impl fmt::Display for ChannelMapFull {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "channel map cannot hold more than {} channels", MAX_CHANNELS)
    }
}

/// Ordered mapping from position in an interleaved frame to a channel role.
///
/// A map is bounded by [`MAX_CHANNELS`]. An empty map is representable, but
/// streams refuse to bind to one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChannelMap {
    channels: ArrayVec<SoundChannel, { MAX_CHANNELS as usize }>,
}

impl ChannelMap {
    /// Create an empty channel map.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mono() -> Self {
        Self::from_fixed(&[SoundChannel::Mono])
    }

    pub fn stereo() -> Self {
        Self::from_fixed(&[SoundChannel::FrontLeft, SoundChannel::FrontRight])
    }

    /// Conventional layout for `count` channels, from mono up to 7.1.
    pub fn default_for(count: u16) -> Option<Self> {
        use SoundChannel::*;

        let layout: &[SoundChannel] = match count {
            1 => &[Mono],
            2 => &[FrontLeft, FrontRight],
            3 => &[FrontLeft, FrontRight, FrontCenter],
            4 => &[FrontLeft, FrontRight, BackLeft, BackRight],
            5 => &[FrontLeft, FrontRight, FrontCenter, BackLeft, BackRight],
            6 => &[FrontLeft, FrontRight, FrontCenter, LowFrequencyEffects, BackLeft, BackRight],
            7 => &[FrontLeft, FrontRight, FrontCenter, LowFrequencyEffects, BackCenter, SideLeft, SideRight],
            8 => &[
                FrontLeft,
                FrontRight,
                FrontCenter,
                LowFrequencyEffects,
                BackLeft,
                BackRight,
                SideLeft,
                SideRight,
            ],
            _ => return None,
        };
        Some(Self::from_fixed(layout))
    }

    /// Build a map from a slice of roles, failing if it is too long.
    pub fn from_channels(channels: &[SoundChannel]) -> Result<Self, ChannelMapFull> {
        let mut map = Self::new();
        for &channel in channels {
            map.try_push(channel)?;
        }
        Ok(map)
    }

    // Only called with layouts known to fit.
    fn from_fixed(channels: &[SoundChannel]) -> Self {
        let mut map = Self::new();
        for &channel in channels.iter().take(MAX_CHANNELS as usize) {
            map.channels.push(channel);
        }
        map
    }

    /// Append a channel role.
    pub fn try_push(&mut self, channel: SoundChannel) -> Result<(), ChannelMapFull> {
        self.channels.try_push(channel).map_err(|_| ChannelMapFull)
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Number of channels as a frame width.
    pub fn channel_count(&self) -> u16 {
        self.channels.len() as u16
    }

    pub fn get(&self, index: usize) -> Option<SoundChannel> {
        self.channels.get(index).copied()
    }

    /// Position of `channel` within a frame, if present.
    pub fn position_of(&self, channel: SoundChannel) -> Option<usize> {
        self.channels.iter().position(|&c| c == channel)
    }

    pub fn iter(&self) -> impl Iterator<Item = SoundChannel> + '_ {
        self.channels.iter().copied()
    }

    pub fn as_slice(&self) -> &[SoundChannel] {
        &self.channels
    }
}

impl TryFrom<&[SoundChannel]> for ChannelMap {
    type Error = ChannelMapFull;

    fn try_from(channels: &[SoundChannel]) -> Result<Self, Self::Error> {
        Self::from_channels(channels)
    }
}
