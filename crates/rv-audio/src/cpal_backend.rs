//! CPAL-based audio output backend.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{Device, Stream, StreamConfig};
use rv_engine::{EngineConfig, PlaybackDevice};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::traits::{AudioError, AudioOutput};

/// CPAL-based audio output.
///
/// The cpal data callback is the engine's real-time mixing context: it
/// renders straight from the [`PlaybackDevice`] into the device buffer.
pub struct CpalOutput {
    device: Device,
    config: StreamConfig,
    stream: Option<Stream>,
    playback: PlaybackDevice,
    running: Arc<AtomicBool>,
}

impl CpalOutput {
    /// Create a new CPAL output with the default device.
    ///
    /// The device's sample rate is kept; the channel count is forced to
    /// `channels` since the engine renders at a fixed width.
    pub fn new(channels: u16) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;

        let config = device
            .default_output_config()
            .map_err(|e| AudioError::DeviceInit(e.to_string()))?;

        let mut config: StreamConfig = config.into();
        config.channels = channels;

        let engine = EngineConfig::default()
            .with_channels(channels)
            .with_sample_rate(config.sample_rate.0);
        let playback = PlaybackDevice::new(engine)?;

        log::info!(
            "Audio output: {} channels at {}Hz",
            config.channels,
            config.sample_rate.0
        );

        Ok(Self {
            device,
            config,
            stream: None,
            playback,
            running: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Build and start the audio stream.
    pub fn build_stream(&mut self) -> Result<(), AudioError> {
        let running = self.running.clone();
        let playback = self.playback.clone();

        let stream = self
            .device
            .build_output_stream(
                &self.config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    if !running.load(Ordering::Relaxed) {
                        data.fill(0.0);
                        return;
                    }
                    playback.render(data);
                },
                |err| log::error!("Audio stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::StreamCreate(e.to_string()))?;

        stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        self.stream = Some(stream);

        Ok(())
    }
}

impl AudioOutput for CpalOutput {
    fn device(&self) -> &PlaybackDevice {
        &self.playback
    }

    fn start(&mut self) -> Result<(), AudioError> {
        self.running.store(true, Ordering::Relaxed);
        if let Some(ref stream) = self.stream {
            stream.play().map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), AudioError> {
        self.running.store(false, Ordering::Relaxed);
        if let Some(ref stream) = self.stream {
            stream.pause().map_err(|e| AudioError::Playback(e.to_string()))?;
        }
        Ok(())
    }
}
