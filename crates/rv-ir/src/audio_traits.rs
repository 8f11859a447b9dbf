//! Source contracts on both sides of the streaming bridge.
//!
//! [`StreamSource`] is what applications implement to push PCM into a
//! stream. [`PullableSource`] is what the engine pulls frames through.

use crate::time::Time;

/// A borrowed view of interleaved 16-bit samples.
///
/// Valid only until the producing source is called again; consumers copy
/// it immediately.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub samples: &'a [i16],
}

impl<'a> Chunk<'a> {
    pub const fn new(samples: &'a [i16]) -> Self {
        Self { samples }
    }

    pub const fn len(&self) -> usize {
        self.samples.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Result of one [`StreamSource::produce`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Produce<'a> {
    /// Keep streaming after this chunk.
    More(Chunk<'a>),
    /// This chunk, possibly empty, is the last one.
    Last(Chunk<'a>),
}

impl<'a> Produce<'a> {
    /// The source has nothing more to give.
    pub fn finished() -> Self {
        Produce::Last(Chunk::default())
    }

    pub fn chunk(&self) -> Chunk<'a> {
        match *self {
            Produce::More(chunk) | Produce::Last(chunk) => chunk,
        }
    }

    pub fn is_continuing(&self) -> bool {
        matches!(self, Produce::More(_))
    }
}

/// Application-side producer of interleaved PCM chunks.
///
/// `produce` is called on the engine's real-time thread and must not block.
/// Returning [`Produce::More`] with an empty chunk over and over stalls the
/// stream; a source has to either deliver samples or eventually finish.
pub trait StreamSource: Send {
    /// Hand out the next chunk of interleaved samples.
    fn produce(&mut self) -> Produce<'_>;

    /// Move the source to `offset` from the beginning of the stream.
    fn seek(&mut self, offset: Time);

    /// Rewind for another loop pass.
    ///
    /// Returns the frame the stream resumes from, or `None` when the source
    /// cannot loop. The default rewinds to the beginning.
    fn on_loop(&mut self) -> Option<u64> {
        self.seek(Time::ZERO);
        Some(0)
    }
}

impl<S: StreamSource + ?Sized> StreamSource for alloc::boxed::Box<S> {
    fn produce(&mut self) -> Produce<'_> {
        (**self).produce()
    }

    fn seek(&mut self, offset: Time) {
        (**self).seek(offset)
    }

    fn on_loop(&mut self) -> Option<u64> {
        (**self).on_loop()
    }
}

/// Sample layout a pullable source delivers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Format {
    pub channels: u16,
    pub sample_rate: u32,
}

/// Engine-side pull contract for a sound's data.
///
/// All methods take `&self`: implementors synchronize internally because
/// the engine thread reads while the owner thread seeks.
pub trait PullableSource: Send + Sync {
    /// Fill `out` with up to `out.len() / channels` frames.
    ///
    /// Returns the number of frames written. 0 means the source is
    /// exhausted, not that an error occurred.
    fn read(&self, out: &mut [i16]) -> usize;

    /// Reposition to `frame_index`, dropping anything buffered.
    fn seek(&self, frame_index: u64);

    /// Fixed at construction.
    fn format(&self) -> Format;

    /// Current frame position, or `None` if the format is unknown.
    fn cursor(&self) -> Option<u64>;

    /// Total length in frames. Streams are unbounded by default.
    fn length(&self) -> Option<u64> {
        None
    }

    fn set_looping(&self, _looping: bool) {}
}
