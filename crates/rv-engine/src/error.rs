//! Engine error types

use thiserror::Error;

/// Errors raised while configuring the engine or editing its graph
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// Channel count outside 1..=MAX_CHANNELS
    #[error("Unsupported channel count: {0}")]
    UnsupportedChannels(u16),

    /// Sample rate of zero
    #[error("Invalid sample rate: {0}Hz")]
    InvalidSampleRate(u32),

    /// Block size of zero
    #[error("Block size must be at least one frame")]
    InvalidBlockSize,

    /// Stale or foreign node id
    #[error("Node not found in graph")]
    UnknownNode,

    /// Operation does not apply to this kind of node
    #[error("Node is not a {0} node")]
    WrongNodeKind(&'static str),

    /// Attaching would route a node back into itself
    #[error("Connecting these nodes would create a cycle")]
    Cycle,

    /// The endpoint is fixed for the life of the engine
    #[error("The endpoint cannot be {0}")]
    EndpointFixed(&'static str),

    /// Source format disagrees with the channel map it was registered with
    #[error("Source delivers {format} channels but its channel map has {map}")]
    ChannelMismatch { format: u16, map: u16 },

    /// Graph reached `EngineConfig::max_nodes`
    #[error("Graph is full ({0} nodes)")]
    CapacityExhausted(usize),

    /// The device has been closed; nothing can start
    #[error("Engine is closed")]
    Closed,
}

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
