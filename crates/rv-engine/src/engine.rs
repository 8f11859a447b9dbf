//! Block renderer that pulls sounds through the node graph.

use std::sync::Arc;

use rv_ir::{AudioBuffer, ChannelMap, PullableSource, SoundSettings};

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::graph::{EndHook, Graph, GraphNode, NodeId, NodeKind, ProcessSlot, SoundNode};
use crate::node::ProcessNode;
use crate::remap::Remap;
use crate::resample::Resampler;

/// The mixing engine.
///
/// Owns the graph and renders interleaved f32 at the configured format.
/// Everything here runs under the device lock; `render` does not allocate.
pub struct Engine {
    config: EngineConfig,
    graph: Graph,
    channel_map: ChannelMap,
    /// Input accumulator for the node being rendered.
    scratch: AudioBuffer,
    closed: bool,
}

impl Engine {
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        let channel_map = ChannelMap::default_for(config.channels)
            .ok_or(EngineError::UnsupportedChannels(config.channels))?;
        log::debug!(
            "Engine: {} channels at {}Hz, {} frame blocks",
            config.channels,
            config.sample_rate,
            config.block_frames
        );
        Ok(Self {
            config,
            graph: Graph::new(config.channels, config.block_frames, config.max_nodes),
            channel_map,
            scratch: AudioBuffer::new(config.channels, config.block_frames),
            closed: false,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn channels(&self) -> u16 {
        self.config.channels
    }

    pub fn sample_rate(&self) -> u32 {
        self.config.sample_rate
    }

    /// Output layout of the endpoint.
    pub fn channel_map(&self) -> &ChannelMap {
        &self.channel_map
    }

    pub fn endpoint(&self) -> NodeId {
        self.graph.endpoint()
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Stop every sound and refuse further starts.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        for (_, node) in self.graph.nodes.iter_mut() {
            if let NodeKind::Sound(sound) = &mut node.kind {
                sound.playing = false;
            }
        }
        log::info!("Engine closed");
    }

    fn check_capacity(&self) -> EngineResult<()> {
        if self.closed {
            return Err(EngineError::Closed);
        }
        if self.graph.len() >= self.config.max_nodes {
            return Err(EngineError::CapacityExhausted(self.config.max_nodes));
        }
        Ok(())
    }

    /// Register a sound pulling from `source`. It starts stopped and detached.
    pub fn add_sound(
        &mut self,
        source: Arc<dyn PullableSource>,
        channel_map: ChannelMap,
    ) -> EngineResult<NodeId> {
        self.check_capacity()?;
        let format = source.format();
        if format.channels == 0 || format.channels != channel_map.channel_count() {
            return Err(EngineError::ChannelMismatch {
                format: format.channels,
                map: channel_map.channel_count(),
            });
        }
        if format.sample_rate == 0 {
            return Err(EngineError::InvalidSampleRate(format.sample_rate));
        }
        let resampler = (format.sample_rate != self.config.sample_rate).then(|| {
            log::debug!(
                "Resampling sound from {}Hz to {}Hz",
                format.sample_rate,
                self.config.sample_rate
            );
            Resampler::new(
                format.sample_rate,
                self.config.sample_rate,
                self.config.channels as usize,
                self.config.block_frames,
            )
        });
        let pull_frames = resampler
            .as_ref()
            .map_or(self.config.block_frames, |rs| rs.capacity());
        let remap = Remap::new(&channel_map, &self.channel_map);
        let scratch = vec![0i16; pull_frames * format.channels as usize];
        let id = self.graph.insert(NodeKind::Sound(SoundNode {
            source,
            channel_map,
            remap,
            settings: SoundSettings::default(),
            playing: false,
            at_end: false,
            on_end: None,
            scratch,
            resampler,
        }));
        log::debug!("Added sound {:?}", id);
        Ok(id)
    }

    /// Register a processing node. It starts detached.
    pub fn add_process_node(&mut self, node: Box<dyn ProcessNode>) -> EngineResult<NodeId> {
        self.check_capacity()?;
        let name = node.name().to_owned();
        let slot = self.graph.new_process_slot(node);
        let id = self.graph.insert(NodeKind::Process(slot));
        log::debug!("Added {} node {:?}", name, id);
        Ok(id)
    }

    pub fn attach_output(&mut self, from: NodeId, to: NodeId) -> EngineResult<()> {
        self.graph.attach_output(from, to)
    }

    pub fn detach_output(&mut self, from: NodeId) -> EngineResult<()> {
        self.graph.detach_output(from)
    }

    pub fn remove_node(&mut self, id: NodeId) -> EngineResult<()> {
        let node = self.graph.remove(id)?;
        log::debug!("Removed {} node {:?}", node.kind.label(), id);
        Ok(())
    }

    fn sound(&self, id: NodeId) -> EngineResult<&SoundNode> {
        match &self.graph.nodes.get(id).ok_or(EngineError::UnknownNode)?.kind {
            NodeKind::Sound(sound) => Ok(sound),
            _ => Err(EngineError::WrongNodeKind("sound")),
        }
    }

    fn sound_mut(&mut self, id: NodeId) -> EngineResult<&mut SoundNode> {
        match &mut self.graph.nodes.get_mut(id).ok_or(EngineError::UnknownNode)?.kind {
            NodeKind::Sound(sound) => Ok(sound),
            _ => Err(EngineError::WrongNodeKind("sound")),
        }
    }

    /// Install the callback run when the sound's source is exhausted.
    pub fn set_end_hook(&mut self, id: NodeId, hook: EndHook) -> EngineResult<()> {
        self.sound_mut(id)?.on_end = Some(hook);
        Ok(())
    }

    pub fn start_sound(&mut self, id: NodeId) -> EngineResult<()> {
        if self.closed {
            return Err(EngineError::Closed);
        }
        let sound = self.sound_mut(id)?;
        sound.playing = true;
        sound.at_end = false;
        Ok(())
    }

    pub fn stop_sound(&mut self, id: NodeId) -> EngineResult<()> {
        self.sound_mut(id)?.playing = false;
        Ok(())
    }

    pub fn is_sound_playing(&self, id: NodeId) -> bool {
        self.sound(id).map(|s| s.playing).unwrap_or(false)
    }

    /// Whether the sound stopped because its source ran dry.
    pub fn is_sound_at_end(&self, id: NodeId) -> bool {
        self.sound(id).map(|s| s.at_end).unwrap_or(false)
    }

    /// Reposition the sound's source at `frame`.
    ///
    /// Input carried by process nodes downstream of the sound predates the
    /// seek and is dropped with it.
    pub fn seek_sound(&mut self, id: NodeId, frame: u64) -> EngineResult<()> {
        let sound = self.sound_mut(id)?;
        sound.source.seek(frame);
        sound.at_end = false;
        if let Some(rs) = sound.resampler.as_mut() {
            rs.reset();
        }

        let mut next = self.graph.output_of(id);
        while let Some(node) = next.and_then(|n| self.graph.nodes.get_mut(n)) {
            if let NodeKind::Process(slot) = &mut node.kind {
                slot.carry_frames = 0;
            }
            next = node.output;
        }
        Ok(())
    }

    pub fn sound_cursor(&self, id: NodeId) -> Option<u64> {
        self.sound(id).ok()?.source.cursor()
    }

    pub fn set_sound_looping(&mut self, id: NodeId, looping: bool) -> EngineResult<()> {
        self.sound(id)?.source.set_looping(looping);
        Ok(())
    }

    pub fn sound_settings(&self, id: NodeId) -> Option<SoundSettings> {
        self.sound(id).ok().map(|s| s.settings)
    }

    pub fn set_sound_settings(&mut self, id: NodeId, settings: SoundSettings) -> EngineResult<()> {
        self.sound_mut(id)?.settings = settings;
        Ok(())
    }

    /// Render interleaved frames into `out`; returns frames written.
    ///
    /// A trailing partial frame in `out` is zeroed.
    pub fn render(&mut self, out: &mut [f32]) -> usize {
        let ch = self.config.channels as usize;
        let total = out.len() / ch;
        let endpoint = self.graph.endpoint();
        let mut done = 0;
        while done < total {
            let frames = (total - done).min(self.config.block_frames);
            self.render_block(frames);
            out[done * ch..(done + frames) * ch]
                .copy_from_slice(self.graph.nodes[endpoint].buffer.head(frames));
            done += frames;
        }
        out[total * ch..].fill(0.0);
        total
    }

    fn render_block(&mut self, frames: usize) {
        let ch = self.config.channels as usize;
        for i in 0..self.graph.order.len() {
            let id = self.graph.order[i];
            if matches!(self.graph.nodes[id].kind, NodeKind::Sound(_)) {
                render_sound(&mut self.graph.nodes[id], frames, ch);
                continue;
            }

            let has_input = self.graph.gather_inputs(id, frames, &mut self.scratch);
            let GraphNode {
                kind,
                buffer,
                active,
                ..
            } = &mut self.graph.nodes[id];
            match kind {
                NodeKind::Endpoint => {
                    buffer.head_mut(frames).copy_from_slice(self.scratch.head(frames));
                }
                NodeKind::Process(slot) => {
                    let input = if has_input {
                        Some(self.scratch.head(frames))
                    } else {
                        None
                    };
                    run_process(slot, input, frames, ch, buffer.head_mut(frames));
                }
                NodeKind::Sound(_) => {}
            }
            *active = true;
        }
    }
}

fn render_sound(node: &mut GraphNode, frames: usize, out_channels: usize) {
    let GraphNode {
        kind,
        buffer,
        active,
        ..
    } = node;
    let NodeKind::Sound(sound) = kind else {
        return;
    };
    let out = buffer.head_mut(frames);
    out.fill(0.0);
    *active = sound.playing;
    if !sound.playing {
        return;
    }

    let src_ch = sound.channel_map.len();
    let mut ended = false;
    let filled = match sound.resampler.as_mut() {
        None => {
            let mut filled = 0;
            while filled < frames {
                let got = sound.source.read(&mut sound.scratch[filled * src_ch..frames * src_ch]);
                if got == 0 {
                    ended = true;
                    break;
                }
                filled += got.min(frames - filled);
            }
            sound.remap.apply(&sound.scratch, src_ch, out, out_channels, filled);
            filled
        }
        Some(rs) => {
            let wanted = rs.frames_wanted(frames);
            while rs.len() < wanted {
                let need = wanted - rs.len();
                let got = sound.source.read(&mut sound.scratch[..need * src_ch]);
                if got == 0 {
                    ended = true;
                    break;
                }
                let got = got.min(need);
                sound
                    .remap
                    .apply(&sound.scratch, src_ch, rs.tail_mut(got), out_channels, got);
                rs.commit(got);
            }
            rs.render(out, frames)
        }
    };

    apply_gain_and_pan(&sound.settings, &mut out[..filled * out_channels], out_channels);

    if ended {
        sound.playing = false;
        sound.at_end = true;
        if let Some(hook) = sound.on_end.as_mut() {
            hook();
        }
    }
}

/// Linear volume on every channel, balance pan on the front pair.
fn apply_gain_and_pan(settings: &SoundSettings, out: &mut [f32], channels: usize) {
    let volume = settings.volume.max(0.0);
    let pan = settings.pan.clamp(-1.0, 1.0);
    let (left, right) = if pan < 0.0 {
        (1.0, 1.0 + pan)
    } else {
        (1.0 - pan, 1.0)
    };
    for frame in out.chunks_exact_mut(channels) {
        for s in frame.iter_mut() {
            *s *= volume;
        }
        if channels >= 2 {
            frame[0] *= left;
            frame[1] *= right;
        }
    }
}

/// Run one processing node, carrying unconsumed input into the next block.
fn run_process(
    slot: &mut ProcessSlot,
    input: Option<&[f32]>,
    frames: usize,
    ch: usize,
    out: &mut [f32],
) {
    let carried = slot.carry_frames;
    let fresh = if input.is_some() { frames } else { 0 };
    let offered = carried + fresh;
    if offered > 0 {
        let stage = slot.staging.head_mut(offered);
        stage[..carried * ch].copy_from_slice(slot.carry.head(carried));
        if let Some(input) = input {
            stage[carried * ch..].copy_from_slice(input);
        }
    }
    let staged = if offered > 0 {
        Some(slot.staging.head(offered))
    } else {
        None
    };

    let mut frames_in = offered;
    let mut frames_out = frames;
    slot.node.process(staged, &mut frames_in, out, &mut frames_out);

    let written = frames_out.min(frames);
    out[written * ch..].fill(0.0);

    let consumed = frames_in.min(offered);
    let leftover = (offered - consumed).min(slot.carry.frames());
    if leftover > 0 {
        let pending = &slot.staging.head(offered)[consumed * ch..(consumed + leftover) * ch];
        slot.carry.head_mut(leftover).copy_from_slice(pending);
    }
    slot.carry_frames = leftover;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Passthrough;
    use core::any::Any;
    use parking_lot::Mutex;
    use rv_ir::Format;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Constant-valued source that runs dry after `total` frames.
    struct Constant {
        format: Format,
        value: i16,
        total: u64,
        pos: Mutex<u64>,
        reads: AtomicUsize,
    }

    impl Constant {
        fn new(channels: u16, value: i16, total: u64) -> Arc<Self> {
            Self::at_rate(channels, value, total, 44100)
        }

        fn at_rate(channels: u16, value: i16, total: u64, sample_rate: u32) -> Arc<Self> {
            Arc::new(Self {
                format: Format {
                    channels,
                    sample_rate,
                },
                value,
                total,
                pos: Mutex::new(0),
                reads: AtomicUsize::new(0),
            })
        }
    }

    impl PullableSource for Constant {
        fn read(&self, out: &mut [i16]) -> usize {
            self.reads.fetch_add(1, Ordering::SeqCst);
            let mut pos = self.pos.lock();
            let ch = self.format.channels as usize;
            let frames = ((out.len() / ch) as u64).min(self.total - *pos) as usize;
            out[..frames * ch].fill(self.value);
            *pos += frames as u64;
            frames
        }

        fn seek(&self, frame_index: u64) {
            *self.pos.lock() = frame_index.min(self.total);
        }

        fn format(&self) -> Format {
            self.format
        }

        fn cursor(&self) -> Option<u64> {
            Some(*self.pos.lock())
        }
    }

    /// Halves the signal and consumes at most `max_in` frames per call.
    struct Halver {
        max_in: usize,
        saw_none: usize,
    }

    impl ProcessNode for Halver {
        fn name(&self) -> &str {
            "halver"
        }

        fn process(
            &mut self,
            input: Option<&[f32]>,
            frames_in: &mut usize,
            output: &mut [f32],
            frames_out: &mut usize,
        ) {
            let Some(input) = input else {
                self.saw_none += 1;
                *frames_in = 0;
                *frames_out = 0;
                return;
            };
            let n = (*frames_in).min(*frames_out).min(self.max_in);
            for (o, i) in output[..n].iter_mut().zip(&input[..n]) {
                *o = *i * 0.5;
            }
            *frames_in = n;
            *frames_out = n;
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn mono_engine(block: usize) -> Engine {
        Engine::new(EngineConfig::default().with_channels(1).with_block_frames(block)).unwrap()
    }

    #[test]
    fn silent_without_sounds() {
        let mut engine = Engine::new(EngineConfig::default()).unwrap();
        let mut out = [1.0f32; 64];
        assert_eq!(engine.render(&mut out), 32);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn rejects_mismatched_channel_map() {
        let mut engine = mono_engine(8);
        let err = engine.add_sound(Constant::new(2, 0, 10), ChannelMap::mono());
        assert_eq!(err, Err(EngineError::ChannelMismatch { format: 2, map: 1 }));
    }

    #[test]
    fn playing_sound_reaches_endpoint() {
        let mut engine = mono_engine(8);
        let id = engine.add_sound(Constant::new(1, 16384, 100), ChannelMap::mono()).unwrap();
        engine.attach_output(id, engine.endpoint()).unwrap();

        let mut out = [0.0f32; 4];
        engine.render(&mut out);
        assert!(out.iter().all(|&s| s == 0.0), "stopped sounds are silent");

        engine.start_sound(id).unwrap();
        engine.render(&mut out);
        assert_eq!(out, [0.5; 4]);
        assert_eq!(engine.sound_cursor(id), Some(4));
    }

    #[test]
    fn exhaustion_stops_sound_and_runs_hook_once() {
        let mut engine = mono_engine(8);
        let id = engine.add_sound(Constant::new(1, 16384, 5), ChannelMap::mono()).unwrap();
        engine.attach_output(id, engine.endpoint()).unwrap();
        let ended = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&ended);
        engine
            .set_end_hook(id, Box::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            }))
            .unwrap();
        engine.start_sound(id).unwrap();

        let mut out = [0.0f32; 8];
        engine.render(&mut out);
        assert_eq!(&out[..5], &[0.5; 5]);
        assert_eq!(&out[5..], &[0.0; 3]);
        assert!(!engine.is_sound_playing(id));
        assert!(engine.is_sound_at_end(id));
        engine.render(&mut out);
        assert_eq!(ended.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn blocks_split_long_renders() {
        let mut engine = mono_engine(4);
        let src = Constant::new(1, 1000, 1000);
        let id = engine.add_sound(src.clone(), ChannelMap::mono()).unwrap();
        engine.attach_output(id, engine.endpoint()).unwrap();
        engine.start_sound(id).unwrap();
        let mut out = [0.0f32; 10];
        assert_eq!(engine.render(&mut out), 10);
        assert_eq!(engine.sound_cursor(id), Some(10));
        assert_eq!(src.reads.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn volume_and_pan_are_applied() {
        let mut engine = Engine::new(EngineConfig::default().with_block_frames(8)).unwrap();
        let id = engine.add_sound(Constant::new(1, 16384, 100), ChannelMap::mono()).unwrap();
        engine.attach_output(id, engine.endpoint()).unwrap();
        engine
            .set_sound_settings(id, SoundSettings {
                volume: 0.5,
                pan: 0.5,
                ..SoundSettings::default()
            })
            .unwrap();
        engine.start_sound(id).unwrap();
        let mut out = [0.0f32; 2];
        engine.render(&mut out);
        assert_eq!(out, [0.125, 0.25]);
    }

    #[test]
    fn process_node_sees_none_when_input_is_idle() {
        let mut engine = mono_engine(4);
        let fx = engine
            .add_process_node(Box::new(Halver {
                max_in: usize::MAX,
                saw_none: 0,
            }))
            .unwrap();
        let id = engine.add_sound(Constant::new(1, 16384, 100), ChannelMap::mono()).unwrap();
        engine.attach_output(fx, engine.endpoint()).unwrap();
        engine.attach_output(id, fx).unwrap();

        let mut out = [0.0f32; 4];
        engine.render(&mut out);
        assert_eq!(engine.graph_mut().process_node_mut::<Halver>(fx).unwrap().saw_none, 1);

        engine.start_sound(id).unwrap();
        engine.render(&mut out);
        assert_eq!(out, [0.25; 4]);
    }

    #[test]
    fn unconsumed_input_is_carried() {
        let mut engine = mono_engine(4);
        let fx = engine
            .add_process_node(Box::new(Halver {
                max_in: 3,
                saw_none: 0,
            }))
            .unwrap();
        let id = engine.add_sound(Constant::new(1, 16384, 100), ChannelMap::mono()).unwrap();
        engine.attach_output(fx, engine.endpoint()).unwrap();
        engine.attach_output(id, fx).unwrap();
        engine.start_sound(id).unwrap();

        let mut out = [0.0f32; 4];
        engine.render(&mut out);
        assert_eq!(out, [0.25, 0.25, 0.25, 0.0]);
        engine.stop_sound(id).unwrap();
        engine.render(&mut out);
        // the frame left over from the first block still comes through
        assert_eq!(out, [0.25, 0.0, 0.0, 0.0]);
    }

    #[test]
    fn passthrough_chain_is_transparent() {
        let mut engine = mono_engine(8);
        let fx = engine.add_process_node(Box::new(Passthrough::new(1))).unwrap();
        let id = engine.add_sound(Constant::new(1, -8192, 100), ChannelMap::mono()).unwrap();
        engine.attach_output(fx, engine.endpoint()).unwrap();
        engine.attach_output(id, fx).unwrap();
        engine.start_sound(id).unwrap();
        let mut out = [0.0f32; 8];
        engine.render(&mut out);
        assert_eq!(out, [-0.25; 8]);
    }

    #[test]
    fn closed_engine_refuses_to_start() {
        let mut engine = mono_engine(8);
        let id = engine.add_sound(Constant::new(1, 0, 10), ChannelMap::mono()).unwrap();
        engine.start_sound(id).unwrap();
        engine.close();
        assert!(!engine.is_sound_playing(id));
        assert_eq!(engine.start_sound(id), Err(EngineError::Closed));
        assert!(matches!(
            engine.add_process_node(Box::new(Passthrough::new(1))),
            Err(EngineError::Closed)
        ));
    }

    #[test]
    fn capacity_is_enforced() {
        let mut engine = Engine::new(EngineConfig::default().with_max_nodes(2)).unwrap();
        engine.add_process_node(Box::new(Passthrough::new(2))).unwrap();
        assert!(matches!(
            engine.add_process_node(Box::new(Passthrough::new(2))),
            Err(EngineError::CapacityExhausted(2))
        ));
    }

    #[test]
    fn seek_clears_end_flag() {
        let mut engine = mono_engine(8);
        let id = engine.add_sound(Constant::new(1, 100, 4), ChannelMap::mono()).unwrap();
        engine.attach_output(id, engine.endpoint()).unwrap();
        engine.start_sound(id).unwrap();
        let mut out = [0.0f32; 8];
        engine.render(&mut out);
        assert!(engine.is_sound_at_end(id));
        engine.seek_sound(id, 0).unwrap();
        assert!(!engine.is_sound_at_end(id));
        assert_eq!(engine.sound_cursor(id), Some(0));
    }

    #[test]
    fn seek_drops_input_carried_downstream() {
        let mut engine = mono_engine(4);
        let fx = engine
            .add_process_node(Box::new(Halver {
                max_in: 3,
                saw_none: 0,
            }))
            .unwrap();
        let id = engine.add_sound(Constant::new(1, 16384, 100), ChannelMap::mono()).unwrap();
        engine.attach_output(fx, engine.endpoint()).unwrap();
        engine.attach_output(id, fx).unwrap();
        engine.start_sound(id).unwrap();

        let mut out = [0.0f32; 4];
        engine.render(&mut out);
        engine.seek_sound(id, 50).unwrap();
        engine.stop_sound(id).unwrap();
        engine.render(&mut out);
        assert_eq!(out, [0.0; 4]);
    }

    #[test]
    fn mismatched_rate_is_resampled() {
        let mut engine = Engine::new(
            EngineConfig::default()
                .with_channels(1)
                .with_sample_rate(48000)
                .with_block_frames(64),
        )
        .unwrap();
        let id = engine
            .add_sound(Constant::at_rate(1, 16384, 100_000, 44100), ChannelMap::mono())
            .unwrap();
        engine.attach_output(id, engine.endpoint()).unwrap();
        engine.start_sound(id).unwrap();

        // 500ms of engine time
        let mut out = vec![0.0f32; 24000];
        assert_eq!(engine.render(&mut out), 24000);
        assert!(out.iter().all(|&s| s == 0.5));
        let cursor = engine.sound_cursor(id).unwrap();
        assert!((22050..=22053).contains(&cursor), "cursor {}", cursor);

        engine.seek_sound(id, 0).unwrap();
        engine.render(&mut out[..64]);
        assert!(engine.sound_cursor(id).unwrap() <= 62);
    }

    #[test]
    fn zero_rate_source_is_rejected() {
        let mut engine = mono_engine(8);
        let err = engine.add_sound(Constant::at_rate(1, 0, 10, 0), ChannelMap::mono());
        assert_eq!(err, Err(EngineError::InvalidSampleRate(0)));
    }
}
