//! Multichannel f32 audio buffer with interleaved layout.

use alloc::vec;
use alloc::vec::Vec;

/// Default block size for audio processing.
pub const BLOCK_SIZE: usize = 256;

/// A multichannel f32 audio buffer in interleaved layout.
///
/// `data[frame * channels + ch]` gives the sample for channel `ch` at
/// `frame`, which is the layout the engine endpoint and effect processors
/// exchange.
#[derive(Clone, Debug)]
pub struct AudioBuffer {
    data: Vec<f32>,
    channels: u16,
    frames: usize,
}

impl AudioBuffer {
    /// Create a new silent buffer with the given dimensions.
    pub fn new(channels: u16, frames: usize) -> Self {
        Self {
            data: vec![0.0; channels as usize * frames],
            channels,
            frames,
        }
    }

    /// Fill all samples with zero.
    pub fn silence(&mut self) {
        self.data.fill(0.0);
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Capacity in frames.
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// The first `frames` frames, interleaved.
    pub fn head(&self, frames: usize) -> &[f32] {
        &self.data[..frames.min(self.frames) * self.channels as usize]
    }

    /// Mutable access to the first `frames` frames, interleaved.
    pub fn head_mut(&mut self, frames: usize) -> &mut [f32] {
        let len = frames.min(self.frames) * self.channels as usize;
        &mut self.data[..len]
    }

    /// One frame's samples.
    pub fn frame(&self, index: usize) -> &[f32] {
        let ch = self.channels as usize;
        &self.data[index * ch..index * ch + ch]
    }

    pub fn frame_mut(&mut self, index: usize) -> &mut [f32] {
        let ch = self.channels as usize;
        &mut self.data[index * ch..index * ch + ch]
    }

    /// Sum the first `frames` frames of `source` into this buffer.
    ///
    /// Only channels present in both buffers are mixed.
    pub fn mix_from(&mut self, source: &AudioBuffer, frames: usize) {
        self.mix_from_scaled(source, frames, 1.0);
    }

    /// Sum the first `frames` frames of `source` into this buffer with gain.
    pub fn mix_from_scaled(&mut self, source: &AudioBuffer, frames: usize, gain: f32) {
        let chs = self.channels.min(source.channels) as usize;
        let frs = frames.min(self.frames).min(source.frames);
        for i in 0..frs {
            let src = source.frame(i);
            let dst = self.frame_mut(i);
            for ch in 0..chs {
                dst[ch] += src[ch] * gain;
            }
        }
    }

    /// Scale all samples by `gain`.
    pub fn apply_gain(&mut self, gain: f32) {
        for s in &mut self.data {
            *s *= gain;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_is_silent() {
        let buf = AudioBuffer::new(2, 4);
        assert_eq!(buf.channels(), 2);
        assert_eq!(buf.frames(), 4);
        assert!(buf.head(4).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn frame_mut_writes_interleaved() {
        let mut buf = AudioBuffer::new(2, 2);
        buf.frame_mut(0)[0] = 1.0;
        buf.frame_mut(1)[1] = -0.5;
        assert_eq!(buf.head(2), &[1.0, 0.0, 0.0, -0.5]);
    }

    #[test]
    fn head_clamps_to_capacity() {
        let buf = AudioBuffer::new(3, 2);
        assert_eq!(buf.head(10).len(), 6);
        assert_eq!(buf.head(1).len(), 3);
    }

    #[test]
    fn silence_clears_data() {
        let mut buf = AudioBuffer::new(1, 2);
        buf.frame_mut(0)[0] = 1.0;
        buf.silence();
        assert_eq!(buf.head(2), &[0.0, 0.0]);
    }

    #[test]
    fn mix_from_sums_frames() {
        let mut dst = AudioBuffer::new(2, 2);
        dst.frame_mut(0)[0] = 0.5;

        let mut src = AudioBuffer::new(2, 2);
        src.frame_mut(0)[0] = 0.3;
        src.frame_mut(1)[1] = 0.7;

        dst.mix_from(&src, 2);
        assert!((dst.frame(0)[0] - 0.8).abs() < 1e-6);
        assert!((dst.frame(1)[1] - 0.7).abs() < 1e-6);
    }

    #[test]
    fn mix_from_scaled_applies_gain() {
        let mut dst = AudioBuffer::new(1, 2);
        let mut src = AudioBuffer::new(1, 2);
        src.frame_mut(0)[0] = 1.0;
        src.frame_mut(1)[0] = -1.0;

        dst.mix_from_scaled(&src, 2, 0.5);
        assert!((dst.frame(0)[0] - 0.5).abs() < 1e-6);
        assert!((dst.frame(1)[0] - -0.5).abs() < 1e-6);
    }

    #[test]
    fn apply_gain_scales_all() {
        let mut buf = AudioBuffer::new(2, 1);
        buf.frame_mut(0).copy_from_slice(&[1.0, -0.5]);
        buf.apply_gain(2.0);
        assert_eq!(buf.frame(0), &[2.0, -1.0]);
    }

    #[test]
    fn mix_from_mismatched_sizes_uses_minimum() {
        let mut dst = AudioBuffer::new(2, 4);
        let mut src = AudioBuffer::new(1, 2);
        src.frame_mut(0)[0] = 1.0;
        src.frame_mut(1)[0] = 2.0;

        dst.mix_from(&src, 4);
        assert_eq!(dst.frame(0), &[1.0, 0.0]);
        assert_eq!(dst.frame(1), &[2.0, 0.0]);
        assert_eq!(dst.frame(2), &[0.0, 0.0]);
    }
}
