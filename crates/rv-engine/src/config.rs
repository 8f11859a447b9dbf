//! Engine configuration.

use rv_ir::{BLOCK_SIZE, MAX_CHANNELS};

use crate::error::{EngineError, EngineResult};

/// Default number of graph nodes, endpoint included.
pub const DEFAULT_MAX_NODES: usize = 256;

/// Output format and sizing of an [`Engine`](crate::Engine).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct EngineConfig {
    /// Interleaved output channels (and effect-node width).
    pub channels: u16,
    pub sample_rate: u32,
    /// Frames rendered per internal block.
    pub block_frames: usize,
    pub max_nodes: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 44100,
            block_frames: BLOCK_SIZE,
            max_nodes: DEFAULT_MAX_NODES,
        }
    }
}

impl EngineConfig {
    pub fn with_channels(mut self, channels: u16) -> Self {
        self.channels = channels;
        self
    }

    pub fn with_sample_rate(mut self, sample_rate: u32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_block_frames(mut self, block_frames: usize) -> Self {
        self.block_frames = block_frames;
        self
    }

    pub fn with_max_nodes(mut self, max_nodes: usize) -> Self {
        self.max_nodes = max_nodes;
        self
    }

    pub fn validate(&self) -> EngineResult<()> {
        if self.channels == 0 || self.channels > MAX_CHANNELS {
            return Err(EngineError::UnsupportedChannels(self.channels));
        }
        if self.sample_rate == 0 {
            return Err(EngineError::InvalidSampleRate(self.sample_rate));
        }
        if self.block_frames == 0 {
            return Err(EngineError::InvalidBlockSize);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid_stereo() {
        let config = EngineConfig::default();
        assert_eq!(config.channels, 2);
        assert_eq!(config.block_frames, BLOCK_SIZE);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_bad_values() {
        let base = EngineConfig::default();
        assert_eq!(
            base.with_channels(0).validate(),
            Err(EngineError::UnsupportedChannels(0))
        );
        assert_eq!(
            base.with_channels(MAX_CHANNELS + 1).validate(),
            Err(EngineError::UnsupportedChannels(MAX_CHANNELS + 1))
        );
        assert_eq!(
            base.with_sample_rate(0).validate(),
            Err(EngineError::InvalidSampleRate(0))
        );
        assert_eq!(
            base.with_block_frames(0).validate(),
            Err(EngineError::InvalidBlockSize)
        );
    }
}
