//! Engine-facing pull source over a push [`StreamSource`].

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use rv_ir::{ChannelMap, Format, PullableSource, StreamSource};

use crate::ring_stage::SampleRingStage;

struct AdapterState<S> {
    stage: SampleRingStage,
    source: S,
}

/// Implements the engine's pull contract for a [`StreamSource`].
///
/// The ring stage and the source sit behind one lock shared by the engine
/// thread (`read`) and the owner thread (`seek`, queries). The loop flag
/// belongs to the owner; the adapter only reads it when a drain meets a
/// finished source.
pub struct DataSourceAdapter<S> {
    state: Mutex<AdapterState<S>>,
    looping: Arc<AtomicBool>,
    channel_map: ChannelMap,
    sample_rate: u32,
}

impl<S: StreamSource> DataSourceAdapter<S> {
    pub fn new(source: S, channel_map: ChannelMap, sample_rate: u32) -> Self {
        let stage = SampleRingStage::new(channel_map.channel_count(), sample_rate);
        Self {
            state: Mutex::new(AdapterState { stage, source }),
            looping: Arc::new(AtomicBool::new(false)),
            channel_map,
            sample_rate,
        }
    }

    pub fn channel_map(&self) -> &ChannelMap {
        &self.channel_map
    }

    /// The owner's loop flag, shared with whoever toggles it.
    pub fn loop_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.looping)
    }

    pub fn is_streaming(&self) -> bool {
        self.state.lock().stage.is_streaming()
    }

    pub fn buffered_frames(&self) -> usize {
        self.state.lock().stage.buffered_frames()
    }

    /// Run `f` against the wrapped source under the adapter lock.
    pub fn with_source<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        f(&mut self.state.lock().source)
    }
}

impl<S: StreamSource> PullableSource for DataSourceAdapter<S> {
    fn read(&self, out: &mut [i16]) -> usize {
        if out.len() < self.channel_map.len() {
            return 0;
        }
        let looping = self.looping.load(Ordering::Acquire);
        let mut state = self.state.lock();
        let AdapterState { stage, source } = &mut *state;
        stage.take(source, looping, out)
    }

    fn seek(&self, frame_index: u64) {
        let mut state = self.state.lock();
        let AdapterState { stage, source } = &mut *state;
        stage.seek_to(source, frame_index);
    }

    fn format(&self) -> Format {
        Format {
            channels: self.channel_map.channel_count(),
            sample_rate: self.sample_rate,
        }
    }

    fn cursor(&self) -> Option<u64> {
        Some(self.state.lock().stage.cursor_frame())
    }
}
