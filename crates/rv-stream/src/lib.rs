//! Pull/push bridge between application-fed PCM and the rivulet engine.
//!
//! A [`StreamSource`](rv_ir::StreamSource) pushes chunks; the engine pulls
//! fixed-size frame blocks through a [`DataSourceAdapter`], which buffers
//! them in a [`SampleRingStage`]. An optional [`EffectGraphNode`] sits
//! between the stream's sound and the engine endpoint.

mod adapter;
mod effect_node;
pub mod effects;
mod ring_stage;
pub mod sources;

pub use adapter::DataSourceAdapter;
pub use effect_node::{effect_processor, EffectGraphNode, EffectProcessor, EffectStage};
pub use ring_stage::SampleRingStage;
pub use sources::{prebuffered, BufferSource, PrebufferedSource, SampleFeeder};
