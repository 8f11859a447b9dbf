//! Chunk-to-frame buffering between a push source and the engine's reads.

use rv_ir::{StreamSource, Time};

/// Absorbs the mismatch between irregular produced chunks and fixed-size
/// frame requests.
///
/// Holds at most one chunk. `cursor` indexes samples in `buffer`, and
/// `samples_processed` counts interleaved samples delivered since the
/// last seek or loop.
pub struct SampleRingStage {
    buffer: Vec<i16>,
    cursor: usize,
    samples_processed: u64,
    streaming: bool,
    /// The source refused to loop at the current drain.
    loop_refused: bool,
    channels: usize,
    sample_rate: u32,
}

impl SampleRingStage {
    pub fn new(channels: u16, sample_rate: u32) -> Self {
        Self {
            buffer: Vec::new(),
            cursor: 0,
            samples_processed: 0,
            streaming: true,
            loop_refused: false,
            channels: channels.max(1) as usize,
            sample_rate,
        }
    }

    pub fn channels(&self) -> u16 {
        self.channels as u16
    }

    /// False once the source has reported its last chunk.
    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    pub fn samples_processed(&self) -> u64 {
        self.samples_processed
    }

    /// Current frame position.
    pub fn cursor_frame(&self) -> u64 {
        self.samples_processed / self.channels as u64
    }

    /// Whole frames buffered but not yet taken.
    pub fn buffered_frames(&self) -> usize {
        (self.buffer.len() - self.cursor) / self.channels
    }

    /// Pull one chunk from `source` if the buffer is empty and the source
    /// is still streaming.
    pub fn refill<S: StreamSource + ?Sized>(&mut self, source: &mut S) {
        if !self.buffer.is_empty() || !self.streaming {
            return;
        }
        let produced = source.produce();
        self.streaming = produced.is_continuing();
        let samples = produced.chunk().samples;
        let whole = samples.len() - samples.len() % self.channels;
        if whole != samples.len() {
            log::warn!(
                "Dropping {} trailing samples of a partial frame",
                samples.len() - whole
            );
        }
        if whole > 0 {
            self.buffer.clear();
            self.buffer.extend_from_slice(&samples[..whole]);
            self.cursor = 0;
        }
    }

    /// Copy up to `out.len() / channels` frames into `out`.
    ///
    /// Returns the frames written; 0 once the source is exhausted and the
    /// buffer drained. `looping` is the owner's loop flag and is consulted
    /// only when a drain meets a finished source.
    pub fn take<S: StreamSource + ?Sized>(
        &mut self,
        source: &mut S,
        looping: bool,
        out: &mut [i16],
    ) -> usize {
        let max_frames = out.len() / self.channels;
        if max_frames == 0 {
            return 0;
        }

        self.refill(source);
        if self.buffer.is_empty() && !self.streaming && looping && !self.loop_refused {
            // A source can finish with an empty chunk; that drain loops too.
            self.rewind(source);
            self.refill(source);
        }
        if self.buffer.is_empty() {
            return 0;
        }

        let frames = max_frames.min(self.buffered_frames());
        let count = frames * self.channels;
        out[..count].copy_from_slice(&self.buffer[self.cursor..self.cursor + count]);
        self.cursor += count;
        self.samples_processed = self.samples_processed.saturating_add(count as u64);

        if self.cursor >= self.buffer.len() {
            self.buffer.clear();
            self.cursor = 0;
            if !self.streaming && looping {
                self.rewind(source);
            }
        }
        frames
    }

    fn rewind<S: StreamSource + ?Sized>(&mut self, source: &mut S) {
        match source.on_loop() {
            Some(frame) => {
                self.streaming = true;
                self.loop_refused = false;
                self.samples_processed = frame.saturating_mul(self.channels as u64);
            }
            None => self.loop_refused = true,
        }
    }

    /// Drop everything buffered and reposition the source at `frame_index`.
    pub fn seek_to<S: StreamSource + ?Sized>(&mut self, source: &mut S, frame_index: u64) {
        self.buffer.clear();
        self.cursor = 0;
        self.streaming = true;
        self.loop_refused = false;
        self.samples_processed = frame_index.saturating_mul(self.channels as u64);
        source.seek(Time::from_frames(frame_index, self.sample_rate));
    }
}
