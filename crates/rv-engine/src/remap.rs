//! Channel conversion from a sound's layout to the engine's.

use arrayvec::ArrayVec;

use rv_ir::{ChannelMap, MAX_CHANNELS};

const SCALE: f32 = 1.0 / 32768.0;

/// How each engine channel is fed from a source frame.
#[derive(Clone, Debug, PartialEq)]
pub enum Remap {
    /// Mono source copied to every output channel.
    Spread,
    /// Multichannel source averaged into a mono engine.
    Downmix,
    /// Per output channel, the source channel with the same role.
    /// Outputs without a matching role stay silent.
    Route(ArrayVec<Option<u8>, { MAX_CHANNELS as usize }>),
}

impl Remap {
    pub fn new(source: &ChannelMap, engine: &ChannelMap) -> Self {
        if source.len() == 1 {
            return Remap::Spread;
        }
        if engine.len() == 1 {
            return Remap::Downmix;
        }
        Remap::Route(
            engine
                .iter()
                .map(|role| source.position_of(role).map(|i| i as u8))
                .collect(),
        )
    }

    /// Convert `frames` interleaved i16 frames into `out` at the engine width.
    pub fn apply(&self, input: &[i16], source_channels: usize, out: &mut [f32], out_channels: usize, frames: usize) {
        for f in 0..frames {
            let src = &input[f * source_channels..(f + 1) * source_channels];
            let dst = &mut out[f * out_channels..(f + 1) * out_channels];
            match self {
                Remap::Spread => dst.fill(src[0] as f32 * SCALE),
                Remap::Downmix => {
                    let sum: f32 = src.iter().map(|&s| s as f32).sum();
                    dst[0] = sum * SCALE / source_channels as f32;
                }
                Remap::Route(route) => {
                    for (d, r) in dst.iter_mut().zip(route) {
                        *d = match r {
                            Some(i) => src[*i as usize] as f32 * SCALE,
                            None => 0.0,
                        };
                    }
                }
            }
        }
    }
}
