//! Core types for the rivulet streaming bridge.
//!
//! This crate defines the value types and the two source contracts shared
//! by the engine, the streaming layer and applications: the push side
//! ([`StreamSource`]) and the pull side ([`PullableSource`]).
//!
//! Designed to be `no_std` compatible with the `alloc` crate.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod audio_buffer;
mod audio_traits;
mod channel_map;
mod settings;
mod time;

pub use audio_buffer::{AudioBuffer, BLOCK_SIZE};
pub use audio_traits::{Chunk, Format, Produce, PullableSource, StreamSource};
pub use channel_map::{ChannelMap, ChannelMapFull, SoundChannel, MAX_CHANNELS};
pub use settings::{Cone, Positioning, SoundSettings};
pub use time::Time;
