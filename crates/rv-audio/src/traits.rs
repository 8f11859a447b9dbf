//! Audio output trait and error types.

use rv_engine::{EngineError, PlaybackDevice};
use thiserror::Error;

/// Error type for audio operations.
#[derive(Error, Debug)]
pub enum AudioError {
    /// Failed to initialize audio device
    #[error("Device init error: {0}")]
    DeviceInit(String),
    /// Failed to create audio stream
    #[error("Stream create error: {0}")]
    StreamCreate(String),
    /// Playback error
    #[error("Playback error: {0}")]
    Playback(String),
    /// No audio device available
    #[error("No audio device available")]
    NoDevice,
    /// The engine rejected the device format
    #[error("Engine setup failed: {0}")]
    Engine(#[from] EngineError),
}

/// Trait for audio output backends.
///
/// A backend owns the real-time context that drives a [`PlaybackDevice`].
pub trait AudioOutput {
    /// The engine this output renders.
    fn device(&self) -> &PlaybackDevice;

    fn sample_rate(&self) -> u32 {
        self.device().sample_rate()
    }

    fn channels(&self) -> u16 {
        self.device().channels()
    }

    /// Start pulling from the engine.
    fn start(&mut self) -> Result<(), AudioError>;

    /// Stop pulling; the engine keeps its state.
    fn stop(&mut self) -> Result<(), AudioError>;
}
