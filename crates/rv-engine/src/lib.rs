//! Mixing engine for the rivulet streaming bridge.
//!
//! Holds a graph of sounds and processing nodes, pulls PCM from sounds in
//! fixed-size blocks and mixes it down at a single endpoint. A
//! [`PlaybackDevice`] shares one engine between the audio callback and the
//! threads that build and edit the graph.

mod config;
mod device;
mod engine;
mod error;
mod graph;
mod node;
mod remap;
mod resample;

pub use config::{EngineConfig, DEFAULT_MAX_NODES};
pub use device::PlaybackDevice;
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use graph::{topological_sort, EndHook, Graph, NodeId};
pub use node::{Passthrough, ProcessNode};
pub use remap::Remap;
