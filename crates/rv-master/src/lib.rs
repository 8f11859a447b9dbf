//! Headless playback control for rivulet streams.
//!
//! Provides the [`SoundStream`] controller plus offline rendering and WAV
//! export that both tests and the CLI share.

mod error;
mod stream;
mod wav;

pub use error::StreamError;
pub use stream::{PlaybackController, SoundStream, Status};
pub use wav::{encode_wav, write_wav};

// Re-export common types so callers don't need every crate directly.
pub use rv_engine::{EngineConfig, EngineError, PlaybackDevice};
pub use rv_ir::{ChannelMap, SoundChannel, SoundSettings, StreamSource, Time};
pub use rv_stream::{
    effect_processor, effects, prebuffered, BufferSource, EffectProcessor, SampleFeeder,
};

/// Render `frames` frames from `device` without an audio backend.
pub fn render_offline(device: &PlaybackDevice, frames: usize) -> Vec<f32> {
    let mut out = vec![0.0f32; frames * device.channels() as usize];
    device.render(&mut out);
    out
}

/// Render `frames` frames from `device` into an in-memory WAV file.
pub fn render_to_wav(device: &PlaybackDevice, frames: usize) -> Vec<u8> {
    let samples = render_offline(device, frames);
    encode_wav(&samples, device.channels(), device.sample_rate())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offline_render_runs_a_stream_to_completion() {
        let device = PlaybackDevice::new(EngineConfig::default()).unwrap();
        let source = BufferSource::new(vec![16384i16; 100], 1, 44100);
        let mut stream = SoundStream::new(&device, source, ChannelMap::mono(), 44100).unwrap();
        stream.resume().unwrap();

        let out = render_offline(&device, 200);
        assert_eq!(out.len(), 400);
        assert!(out[..200].iter().all(|&s| s == 0.5));
        assert!(out[200..].iter().all(|&s| s == 0.0));
        assert_eq!(stream.status(), Status::Stopped);
    }

    #[test]
    fn wav_export_has_header_and_data() {
        let device = PlaybackDevice::new(EngineConfig::default().with_channels(1)).unwrap();
        let wav = render_to_wav(&device, 10);
        assert_eq!(&wav[..4], b"RIFF");
        assert_eq!(wav.len(), 44 + 20);
    }
}
