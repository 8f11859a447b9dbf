//! WAV encoding for interleaved 16-bit PCM.

use std::io::Write;

const BITS_PER_SAMPLE: u16 = 16;

/// Encode interleaved f32 samples in [-1, 1] as a 16-bit PCM WAV file.
pub fn encode_wav(samples: &[f32], channels: u16, sample_rate: u32) -> Vec<u8> {
    let channels = channels.max(1);
    let frames = samples.len() / channels as usize;
    let block_align = channels * (BITS_PER_SAMPLE / 8);
    let data_size = frames as u32 * block_align as u32;

    let mut buf = Vec::with_capacity(44 + data_size as usize);
    riff_header(&mut buf, data_size);
    fmt_chunk(&mut buf, channels, sample_rate, block_align);
    data_chunk(&mut buf, &samples[..frames * channels as usize], data_size);
    buf
}

pub fn write_wav(
    w: &mut impl Write,
    samples: &[f32],
    channels: u16,
    sample_rate: u32,
) -> std::io::Result<()> {
    w.write_all(&encode_wav(samples, channels, sample_rate))
}

fn riff_header(buf: &mut Vec<u8>, data_size: u32) {
    buf.extend_from_slice(b"RIFF");
    buf.extend_from_slice(&(36 + data_size).to_le_bytes());
    buf.extend_from_slice(b"WAVE");
}

fn fmt_chunk(buf: &mut Vec<u8>, channels: u16, sample_rate: u32, block_align: u16) {
    buf.extend_from_slice(b"fmt ");
    buf.extend_from_slice(&16u32.to_le_bytes());
    buf.extend_from_slice(&1u16.to_le_bytes());
    buf.extend_from_slice(&channels.to_le_bytes());
    buf.extend_from_slice(&sample_rate.to_le_bytes());
    buf.extend_from_slice(&(sample_rate * block_align as u32).to_le_bytes());
    buf.extend_from_slice(&block_align.to_le_bytes());
    buf.extend_from_slice(&BITS_PER_SAMPLE.to_le_bytes());
}

fn data_chunk(buf: &mut Vec<u8>, samples: &[f32], data_size: u32) {
    buf.extend_from_slice(b"data");
    buf.extend_from_slice(&data_size.to_le_bytes());
    for &s in samples {
        buf.extend_from_slice(&to_i16(s).to_le_bytes());
    }
}

fn to_i16(sample: f32) -> i16 {
    (sample.clamp(-1.0, 1.0) * 32767.0) as i16
}
