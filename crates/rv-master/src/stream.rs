//! Playback controller for one streamed sound.

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::Arc;

use rv_engine::{EngineError, NodeId, PlaybackDevice};
use rv_ir::{ChannelMap, PullableSource, SoundSettings, StreamSource, Time};
use rv_stream::{DataSourceAdapter, EffectGraphNode, EffectProcessor};

use crate::error::{fail, warn_failed, StreamError};

/// Playback state of a [`SoundStream`].
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Status {
    Stopped = 0,
    Paused = 1,
    Playing = 2,
}

impl Status {
    fn from_u8(value: u8) -> Self {
        match value {
            1 => Status::Paused,
            2 => Status::Playing,
            _ => Status::Stopped,
        }
    }
}

/// Status shared between the owner and the engine's end hook.
///
/// Every transition happens under the engine lock.
#[derive(Clone)]
struct SharedStatus(Arc<AtomicU8>);

impl SharedStatus {
    fn new() -> Self {
        Self(Arc::new(AtomicU8::new(Status::Stopped as u8)))
    }

    fn get(&self) -> Status {
        Status::from_u8(self.0.load(Ordering::Acquire))
    }

    fn set(&self, status: Status) {
        self.0.store(status as u8, Ordering::Release);
    }
}

/// A sound fed by a [`StreamSource`] and played on a [`PlaybackDevice`].
///
/// Owns the Stopped/Playing/Paused state machine and translates between
/// time offsets and frames. The source is pulled on the engine's thread;
/// see [`StreamSource`] for what that demands of `produce`.
pub struct SoundStream<S: StreamSource + 'static> {
    device: PlaybackDevice,
    adapter: Arc<DataSourceAdapter<S>>,
    sound: NodeId,
    effect: EffectGraphNode,
    status: SharedStatus,
    looping: Arc<AtomicBool>,
    sample_rate: u32,
}

/// The controller under its role name.
pub type PlaybackController<S> = SoundStream<S>;

impl<S: StreamSource + 'static> SoundStream<S> {
    /// Register `source` with `device`, stopped, routed straight to the
    /// endpoint.
    ///
    /// On failure nothing is left behind in the engine graph.
    pub fn new(
        device: &PlaybackDevice,
        source: S,
        channel_map: ChannelMap,
        sample_rate: u32,
    ) -> Result<Self, StreamError> {
        if channel_map.is_empty() {
            log::error!("Failed to initialize stream: empty channel map");
            return Err(StreamError::InvalidChannelMap);
        }
        if sample_rate == 0 {
            log::error!("Failed to initialize stream: sample rate is zero");
            return Err(StreamError::InvalidSampleRate(sample_rate));
        }

        let adapter = Arc::new(DataSourceAdapter::new(source, channel_map.clone(), sample_rate));
        let looping = adapter.loop_flag();
        let status = SharedStatus::new();

        let hook_status = status.clone();
        let hook_adapter = Arc::clone(&adapter);
        let sound = device.with_engine(|engine| {
            let sound = engine
                .add_sound(adapter.clone(), channel_map)
                .map_err(|err| fail("initialize sound", err))?;
            let on_end = Box::new(move || {
                hook_status.set(Status::Stopped);
                hook_adapter.seek(0);
            });
            if let Err(err) = engine.set_end_hook(sound, on_end) {
                warn_failed("remove sound", engine.remove_node(sound));
                return Err(fail("install end hook", err));
            }
            Ok(sound)
        })?;

        let effect = match EffectGraphNode::new(device, sound) {
            Ok(effect) => effect,
            Err(err) => {
                let removed = device.with_engine(|engine| engine.remove_node(sound));
                warn_failed("remove sound", removed);
                return Err(fail("initialize effect node", err));
            }
        };

        log::debug!(
            "Stream {:?}: {} channels at {}Hz",
            sound,
            adapter.channel_map().len(),
            sample_rate
        );

        Ok(Self {
            device: device.clone(),
            adapter,
            sound,
            effect,
            status,
            looping,
            sample_rate,
        })
    }

    pub fn device(&self) -> &PlaybackDevice {
        &self.device
    }

    pub fn sound_id(&self) -> NodeId {
        self.sound
    }

    pub fn channel_map(&self) -> &ChannelMap {
        self.adapter.channel_map()
    }

    pub fn channel_count(&self) -> u16 {
        self.adapter.channel_map().channel_count()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn status(&self) -> Status {
        self.status.get()
    }

    /// Start or continue consuming the stream.
    ///
    /// Fails, with the status untouched, if the engine will not start.
    pub fn resume(&mut self) -> Result<(), StreamError> {
        let sound = self.sound;
        let status = self.status.clone();
        self.device
            .with_engine(|engine| -> Result<(), EngineError> {
                engine.start_sound(sound)?;
                status.set(Status::Playing);
                Ok(())
            })
            .map_err(|err| {
                log::error!("Failed to start sound: {}", err);
                StreamError::Start(err)
            })
    }

    /// Playing → Paused, keeping the offset. Other states are unchanged.
    pub fn pause(&mut self) {
        let sound = self.sound;
        let status = self.status.clone();
        self.device.with_engine(|engine| {
            if status.get() == Status::Playing {
                warn_failed("stop sound", engine.stop_sound(sound));
                status.set(Status::Paused);
            }
        });
    }

    /// Stop and rewind so the next `resume` starts from the beginning.
    pub fn stop(&mut self) {
        let sound = self.sound;
        let status = self.status.clone();
        self.device.with_engine(|engine| {
            warn_failed("stop sound", engine.stop_sound(sound));
            status.set(Status::Stopped);
            warn_failed("rewind sound", engine.seek_sound(sound, 0));
        });
    }

    /// Seek to `offset`, then resume. Restarts a stream that is already
    /// playing.
    pub fn play(&mut self, offset: Time) -> Result<(), StreamError> {
        let sound = self.sound;
        let frame = offset.to_frames(self.sample_rate);
        let status = self.status.clone();
        self.device
            .with_engine(|engine| -> Result<(), EngineError> {
                engine.seek_sound(sound, frame)?;
                engine.start_sound(sound)?;
                status.set(Status::Playing);
                Ok(())
            })
            .map_err(|err| {
                log::error!("Failed to start sound: {}", err);
                StreamError::Start(err)
            })
    }

    /// Jump to `offset`, dropping buffered samples.
    ///
    /// Ignored while stopped; a stopped stream is always at offset zero.
    pub fn set_playing_offset(&mut self, offset: Time) {
        if self.status() == Status::Stopped {
            log::debug!("Ignoring seek on a stopped stream");
            return;
        }
        let sound = self.sound;
        let frame = offset.to_frames(self.sample_rate);
        let result = self.device.with_engine(|engine| engine.seek_sound(sound, frame));
        warn_failed("seek sound", result);
    }

    pub fn playing_offset(&self) -> Time {
        let frames = self.adapter.cursor().unwrap_or(0);
        Time::from_frames(frames, self.sample_rate)
    }

    /// Rewind to the source's loop point whenever it runs out.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping.store(looping, Ordering::Release);
        let sound = self.sound;
        let result = self
            .device
            .with_engine(|engine| engine.set_sound_looping(sound, looping));
        warn_failed("set looping", result);
    }

    pub fn is_looping(&self) -> bool {
        self.looping.load(Ordering::Acquire)
    }

    /// Install or clear the effect processor and reroute to match.
    pub fn set_effect_processor(
        &mut self,
        processor: Option<EffectProcessor>,
    ) -> Result<(), StreamError> {
        self.effect
            .set_processor(processor)
            .map_err(|err| fail("connect effect node", err))
    }

    pub fn has_effect(&self) -> bool {
        self.effect.is_connected()
    }

    pub fn settings(&self) -> SoundSettings {
        let sound = self.sound;
        self.device
            .with_engine(|engine| engine.sound_settings(sound))
            .unwrap_or_default()
    }

    /// Hand `settings` to the engine unchanged.
    pub fn set_settings(&mut self, settings: SoundSettings) -> Result<(), StreamError> {
        let sound = self.sound;
        self.device
            .with_engine(|engine| engine.set_sound_settings(sound, settings))
            .map_err(|err| fail("apply sound settings", err))
    }

    pub fn set_volume(&mut self, volume: f32) -> Result<(), StreamError> {
        let settings = SoundSettings {
            volume,
            ..self.settings()
        };
        self.set_settings(settings)
    }

    pub fn set_pan(&mut self, pan: f32) -> Result<(), StreamError> {
        let settings = SoundSettings {
            pan,
            ..self.settings()
        };
        self.set_settings(settings)
    }

    /// Run `f` against the source under the adapter lock.
    pub fn with_source<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        self.adapter.with_source(f)
    }
}

impl<S: StreamSource + 'static> Drop for SoundStream<S> {
    fn drop(&mut self) {
        let sound = self.sound;
        let effect = &mut self.effect;
        self.device.with_engine(|engine| {
            warn_failed("stop sound", engine.stop_sound(sound));
            effect.release(engine);
            warn_failed("remove sound", engine.remove_node(sound));
        });
    }
}
