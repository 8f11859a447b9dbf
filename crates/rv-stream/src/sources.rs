//! Stream sources for in-memory PCM and for producer threads.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use ringbuf::traits::{Consumer, Observer, Producer, Split};
use ringbuf::{HeapCons, HeapProd, HeapRb};

use rv_ir::{Chunk, Produce, StreamSource, Time};

/// Default chunk size handed out by [`BufferSource`].
pub const DEFAULT_CHUNK_FRAMES: usize = 4096;

/// Streams interleaved samples held in memory, a chunk at a time.
///
/// Looping resumes at `loop_start` rather than the beginning.
pub struct BufferSource {
    samples: Arc<[i16]>,
    channels: usize,
    sample_rate: u32,
    chunk_frames: usize,
    position: usize,
    loop_start: u64,
}

impl BufferSource {
    /// A trailing partial frame in `samples` is never played.
    pub fn new(samples: impl Into<Arc<[i16]>>, channels: u16, sample_rate: u32) -> Self {
        Self {
            samples: samples.into(),
            channels: channels.max(1) as usize,
            sample_rate,
            chunk_frames: DEFAULT_CHUNK_FRAMES,
            position: 0,
            loop_start: 0,
        }
    }

    pub fn with_chunk_frames(mut self, frames: usize) -> Self {
        self.chunk_frames = frames.max(1);
        self
    }

    pub fn with_loop_start(mut self, frame: u64) -> Self {
        self.loop_start = frame.min(self.frames());
        self
    }

    pub fn frames(&self) -> u64 {
        (self.samples.len() / self.channels) as u64
    }

    pub fn duration(&self) -> Time {
        Time::from_frames(self.frames(), self.sample_rate)
    }

    /// Next frame `produce` hands out.
    pub fn position(&self) -> u64 {
        (self.position / self.channels) as u64
    }

    fn end(&self) -> usize {
        self.frames() as usize * self.channels
    }
}

impl StreamSource for BufferSource {
    fn produce(&mut self) -> Produce<'_> {
        let end = self.end();
        if self.position >= end {
            return Produce::finished();
        }
        let start = self.position;
        let stop = (start + self.chunk_frames * self.channels).min(end);
        self.position = stop;
        let chunk = Chunk::new(&self.samples[start..stop]);
        if stop >= end {
            Produce::Last(chunk)
        } else {
            Produce::More(chunk)
        }
    }

    fn seek(&mut self, offset: Time) {
        let frame = offset.to_frames(self.sample_rate).min(self.frames());
        self.position = frame as usize * self.channels;
    }

    fn on_loop(&mut self) -> Option<u64> {
        self.position = self.loop_start as usize * self.channels;
        Some(self.loop_start)
    }
}

struct FeedState {
    closed: AtomicBool,
    detached: AtomicBool,
    underruns: AtomicU64,
}

/// Create a lock-free SPSC pair for feeding a stream from another thread.
///
/// `capacity_frames` sizes the ring. `block_frames` caps each produced
/// chunk and is the length of the silence block handed out on underrun.
pub fn prebuffered(
    capacity_frames: usize,
    channels: u16,
    block_frames: usize,
) -> (SampleFeeder, PrebufferedSource) {
    let channels = channels.max(1) as usize;
    let block_frames = block_frames.max(1);
    let rb = HeapRb::<i16>::new(capacity_frames.max(1) * channels);
    let (producer, consumer) = rb.split();
    let state = Arc::new(FeedState {
        closed: AtomicBool::new(false),
        detached: AtomicBool::new(false),
        underruns: AtomicU64::new(0),
    });
    (
        SampleFeeder {
            producer,
            channels,
            state: Arc::clone(&state),
        },
        PrebufferedSource {
            consumer,
            channels,
            block: vec![0; block_frames * channels],
            state,
        },
    )
}

/// Producer half of [`prebuffered`]. Dropping it closes the stream.
pub struct SampleFeeder {
    producer: HeapProd<i16>,
    channels: usize,
    state: Arc<FeedState>,
}

impl SampleFeeder {
    /// Push as many whole frames of `samples` as fit; returns frames pushed.
    pub fn push(&mut self, samples: &[i16]) -> usize {
        let fit = self.producer.vacant_len() / self.channels;
        let frames = (samples.len() / self.channels).min(fit);
        self.producer.push_slice(&samples[..frames * self.channels]);
        frames
    }

    pub fn vacant_frames(&self) -> usize {
        self.producer.vacant_len() / self.channels
    }

    /// No more samples will follow; the stream ends once the ring drains.
    pub fn close(&self) {
        self.state.closed.store(true, Ordering::Release);
    }

    /// The consuming stream has been dropped.
    pub fn is_detached(&self) -> bool {
        self.state.detached.load(Ordering::Acquire)
    }
}

impl Drop for SampleFeeder {
    fn drop(&mut self) {
        self.close();
    }
}

/// Consumer half of [`prebuffered`]; never blocks in `produce`.
pub struct PrebufferedSource {
    consumer: HeapCons<i16>,
    channels: usize,
    block: Vec<i16>,
    state: Arc<FeedState>,
}

impl PrebufferedSource {
    /// Silence blocks handed out because the ring was empty.
    pub fn underruns(&self) -> u64 {
        self.state.underruns.load(Ordering::Relaxed)
    }

    pub fn buffered_frames(&self) -> usize {
        self.consumer.occupied_len() / self.channels
    }
}

impl StreamSource for PrebufferedSource {
    fn produce(&mut self) -> Produce<'_> {
        let closed = self.state.closed.load(Ordering::Acquire);
        let frames = (self.consumer.occupied_len() / self.channels).min(self.block.len() / self.channels);
        if frames == 0 {
            if closed {
                return Produce::finished();
            }
            self.state.underruns.fetch_add(1, Ordering::Relaxed);
            self.block.fill(0);
            return Produce::More(Chunk::new(&self.block));
        }
        let len = frames * self.channels;
        let popped = self.consumer.pop_slice(&mut self.block[..len]);
        Produce::More(Chunk::new(&self.block[..popped]))
    }

    fn seek(&mut self, offset: Time) {
        log::debug!(
            "Prebuffered stream cannot seek to {}ms; continuing from the live position",
            offset.as_millis()
        );
    }

    fn on_loop(&mut self) -> Option<u64> {
        None
    }
}

impl Drop for PrebufferedSource {
    fn drop(&mut self) {
        self.state.detached.store(true, Ordering::Release);
    }
}
