//! Ready-made effect processors.
//!
//! Each constructor returns an [`EffectProcessor`] that keeps its own state
//! across blocks. They consume input frame for frame except `echo`, which
//! keeps ringing out after its input ends.

use core::f32::consts::TAU;

use rv_ir::MAX_CHANNELS;

use crate::effect_node::{effect_processor, EffectProcessor};

/// One-pole RC low-pass: `y = y_prev + alpha * (x - y_prev)` per channel.
pub fn low_pass(cutoff_hz: f32, sample_rate: u32) -> EffectProcessor {
    let alpha = low_pass_alpha(cutoff_hz, sample_rate);
    let mut prev = [0.0f32; MAX_CHANNELS as usize];
    effect_processor(move |input, frames_in, output, frames_out, channels| {
        let Some(input) = input else {
            *frames_out = 0;
            return;
        };
        let ch = (channels as usize).clamp(1, MAX_CHANNELS as usize);
        let frames = (*frames_in).min(*frames_out);
        for (src, dst) in input
            .chunks_exact(ch)
            .zip(output.chunks_exact_mut(ch))
            .take(frames)
        {
            for c in 0..ch {
                prev[c] += alpha * (src[c] - prev[c]);
                dst[c] = prev[c];
            }
        }
        *frames_in = frames;
        *frames_out = frames;
    })
}

fn low_pass_alpha(cutoff_hz: f32, sample_rate: u32) -> f32 {
    if sample_rate == 0 {
        return 1.0;
    }
    (TAU * cutoff_hz / sample_rate as f32).clamp(0.0, 1.0)
}

/// Scale every sample by `factor`.
pub fn gain(factor: f32) -> EffectProcessor {
    effect_processor(move |input, frames_in, output, frames_out, channels| {
        let Some(input) = input else {
            *frames_out = 0;
            return;
        };
        let frames = (*frames_in).min(*frames_out);
        let len = frames * channels as usize;
        for (dst, src) in output[..len].iter_mut().zip(&input[..len]) {
            *dst = *src * factor;
        }
        *frames_in = frames;
        *frames_out = frames;
    })
}

/// Feedback delay of `delay_frames`, mixed with the dry signal by `mix`.
///
/// Once input stops the tail keeps sounding until it decays below
/// -60 dB. The delay line is allocated here, wide enough for any layout.
pub fn echo(delay_frames: usize, feedback: f32, mix: f32) -> EffectProcessor {
    let delay_frames = delay_frames.max(1);
    let feedback = feedback.clamp(0.0, 0.99);
    let mix = mix.clamp(0.0, 1.0);
    let mut line = vec![0.0f32; delay_frames * MAX_CHANNELS as usize];
    let mut line_channels = 0usize;
    let mut pos = 0usize;
    let mut tail = 0usize;

    effect_processor(move |input, frames_in, output, frames_out, channels| {
        let ch = (channels as usize).clamp(1, MAX_CHANNELS as usize);
        if ch != line_channels {
            line.fill(0.0);
            line_channels = ch;
            pos = 0;
        }

        let frames = match input {
            Some(_) => (*frames_in).min(*frames_out),
            None if tail > 0 => tail.min(*frames_out),
            None => 0,
        };

        for f in 0..frames {
            let base = pos * ch;
            for c in 0..ch {
                let dry = input.map_or(0.0, |i| i[f * ch + c]);
                let wet = line[base + c];
                line[base + c] = dry + wet * feedback;
                output[f * ch + c] = dry * (1.0 - mix) + wet * mix;
            }
            pos = (pos + 1) % delay_frames;
        }

        if input.is_some() {
            tail = ring_out_frames(delay_frames, feedback);
            *frames_in = frames;
        } else {
            tail -= frames;
        }
        *frames_out = frames;
    })
}

/// Frames until feedback decays below -60 dB.
fn ring_out_frames(delay_frames: usize, feedback: f32) -> usize {
    if feedback <= 0.0 {
        return delay_frames;
    }
    let repeats = (0.001f32.ln() / feedback.ln()).ceil().max(1.0) as usize;
    delay_frames * (repeats + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(
        fx: &mut EffectProcessor,
        input: Option<&[f32]>,
        frames: usize,
        channels: u16,
        out: &mut [f32],
    ) -> (usize, usize) {
        let mut fin = if input.is_some() { frames } else { 0 };
        let mut fout = frames;
        fx(input, &mut fin, out, &mut fout, channels);
        (fin, fout)
    }

    #[test]
    fn low_pass_alpha_matches_rc_formula() {
        let expected = TAU * 4410.0 / 44100.0;
        assert!((low_pass_alpha(4410.0, 44100) - expected).abs() < 1e-6);
        assert_eq!(low_pass_alpha(40000.0, 44100), 1.0);
    }

    #[test]
    fn low_pass_attenuates_alternating_signal() {
        let mut fx = low_pass(4410.0, 44100);
        let input: Vec<f32> = (0..200)
            .flat_map(|i| {
                let v = if i % 2 == 0 { 1.0 } else { -1.0 };
                [v, v]
            })
            .collect();
        let mut out = vec![0.0f32; 400];
        assert_eq!(run(&mut fx, Some(&input), 200, 2, &mut out), (200, 200));
        let peak = out.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
        assert!(peak < 0.95, "peak should be attenuated, got {}", peak);
    }

    #[test]
    fn low_pass_passes_dc() {
        let mut fx = low_pass(4410.0, 44100);
        let input = vec![0.5f32; 300];
        let mut out = vec![0.0f32; 300];
        run(&mut fx, Some(&input), 100, 3, &mut out);
        let last = out[299];
        assert!((last - 0.5).abs() < 0.01, "DC should pass through, got {}", last);
    }

    #[test]
    fn gain_scales_and_reports_counts() {
        let mut fx = gain(0.5);
        let input = [1.0f32, -1.0, 0.5, 0.25];
        let mut out = [0.0f32; 4];
        assert_eq!(run(&mut fx, Some(&input), 2, 2, &mut out), (2, 2));
        assert_eq!(out, [0.5, -0.5, 0.25, 0.125]);
        assert_eq!(run(&mut fx, None, 2, 2, &mut out), (0, 0));
    }

    #[test]
    fn echo_repeats_after_delay() {
        let mut fx = echo(2, 0.5, 1.0);
        let input = [1.0f32, 0.0, 0.0, 0.0];
        let mut out = [0.0f32; 4];
        run(&mut fx, Some(&input), 4, 1, &mut out);
        assert_eq!(out, [0.0, 0.0, 1.0, 0.0]);
        run(&mut fx, Some(&[0.0; 4]), 4, 1, &mut out);
        assert_eq!(out, [0.5, 0.0, 0.25, 0.0]);
    }

    #[test]
    fn echo_rings_out_then_stops() {
        let mut fx = echo(4, 0.5, 0.5);
        let input = [1.0f32; 4];
        let mut out = [0.0f32; 8];
        run(&mut fx, Some(&input), 4, 1, &mut out[..4]);

        let mut emitted = 0;
        for _ in 0..100 {
            let (fin, fout) = run(&mut fx, None, 8, 1, &mut out);
            assert_eq!(fin, 0);
            if fout == 0 {
                break;
            }
            emitted += fout;
        }
        assert_eq!(emitted, ring_out_frames(4, 0.5));
        assert_eq!(run(&mut fx, None, 8, 1, &mut out), (0, 0));
    }
}
