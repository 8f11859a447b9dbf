//! Linear sample-rate conversion from a sound's rate to the engine's.

/// Streaming linear interpolator over a window of source frames.
///
/// Frames in the window are already at the engine's channel width. `pos`
/// is the fractional source index of the next output frame; frames before
/// `floor(pos)` are dropped after every block.
pub(crate) struct Resampler {
    step: f64,
    pos: f64,
    window: Vec<f32>,
    len: usize,
    channels: usize,
}

impl Resampler {
    pub fn new(source_rate: u32, engine_rate: u32, channels: usize, block_frames: usize) -> Self {
        let step = source_rate as f64 / engine_rate as f64;
        let capacity = (block_frames as f64 * step).ceil() as usize + 3;
        Self {
            step,
            pos: 0.0,
            window: vec![0.0; capacity * channels],
            len: 0,
            channels,
        }
    }

    /// Largest number of source frames one block can need.
    pub fn capacity(&self) -> usize {
        self.window.len() / self.channels
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Forget buffered frames, e.g. after a seek.
    pub fn reset(&mut self) {
        self.pos = 0.0;
        self.len = 0;
    }

    /// Source frames the window must hold to render `frames` output frames.
    pub fn frames_wanted(&self, frames: usize) -> usize {
        if frames == 0 {
            return self.len;
        }
        let last = self.pos + (frames - 1) as f64 * self.step;
        (last as usize + 2).min(self.capacity())
    }

    /// Space for `frames` more source frames after the buffered ones.
    pub fn tail_mut(&mut self, frames: usize) -> &mut [f32] {
        let ch = self.channels;
        &mut self.window[self.len * ch..(self.len + frames) * ch]
    }

    pub fn commit(&mut self, frames: usize) {
        self.len = (self.len + frames).min(self.capacity());
    }

    /// Interpolate up to `frames` frames into `out`; returns frames written.
    ///
    /// Stops early when the window runs out of right-hand neighbours.
    pub fn render(&mut self, out: &mut [f32], frames: usize) -> usize {
        let ch = self.channels;
        let mut written = 0;
        while written < frames {
            let i = self.pos as usize;
            if i + 1 >= self.len {
                break;
            }
            let t = (self.pos - i as f64) as f32;
            for c in 0..ch {
                let a = self.window[i * ch + c];
                let b = self.window[(i + 1) * ch + c];
                out[written * ch + c] = a + (b - a) * t;
            }
            written += 1;
            self.pos += self.step;
        }

        let consumed = (self.pos as usize).min(self.len);
        self.window.copy_within(consumed * ch..self.len * ch, 0);
        self.len -= consumed;
        self.pos -= consumed as f64;
        written
    }
}
