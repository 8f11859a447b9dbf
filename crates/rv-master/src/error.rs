//! Stream error types.

use rv_engine::{EngineError, EngineResult};
use thiserror::Error;

/// Errors raised while setting up or driving a [`SoundStream`](crate::SoundStream).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("Channel map must name at least one channel")]
    InvalidChannelMap,

    #[error("Invalid sample rate: {0}Hz")]
    InvalidSampleRate(u32),

    /// A graph step failed during construction or rewiring.
    #[error("Failed to {step}")]
    Setup {
        step: &'static str,
        #[source]
        source: EngineError,
    },

    /// The engine refused to start the sound.
    #[error("Failed to start stream")]
    Start(#[source] EngineError),
}

/// Log and wrap a failed graph step.
pub(crate) fn fail(step: &'static str, err: EngineError) -> StreamError {
    log::error!("Failed to {}: {}", step, err);
    StreamError::Setup { step, source: err }
}

/// Log a graph step that failed where the caller cannot report it.
///
/// Returns whether the step succeeded.
pub(crate) fn warn_failed(step: &'static str, result: EngineResult<()>) -> bool {
    match result {
        Ok(()) => true,
        Err(err) => {
            log::warn!("Failed to {}: {}", step, err);
            false
        }
    }
}
