//! Optional effect stage between a stream's sound and the engine endpoint.

use std::any::Any;

use rv_engine::{Engine, EngineResult, NodeId, PlaybackDevice, ProcessNode};

/// Per-block effect callback.
///
/// Arguments are `(input, frames_in, output, frames_out, channels)` with the
/// same in/out count semantics as [`ProcessNode::process`]. `input` is
/// `None` and `frames_in` 0 when the stream has nothing to offer.
pub type EffectProcessor =
    Box<dyn FnMut(Option<&[f32]>, &mut usize, &mut [f32], &mut usize, u16) + Send>;

/// Box a closure as an [`EffectProcessor`].
pub fn effect_processor<F>(f: F) -> EffectProcessor
where
    F: FnMut(Option<&[f32]>, &mut usize, &mut [f32], &mut usize, u16) + Send + 'static,
{
    Box::new(f)
}

/// The processing node living in the engine graph.
pub struct EffectStage {
    channels: u16,
    processor: Option<EffectProcessor>,
}

impl EffectStage {
    pub fn new(channels: u16) -> Self {
        Self {
            channels,
            processor: None,
        }
    }

    pub fn channel_count(&self) -> u16 {
        self.channels
    }

    pub fn has_processor(&self) -> bool {
        self.processor.is_some()
    }

    pub fn set_processor(&mut self, processor: Option<EffectProcessor>) {
        self.processor = processor;
    }
}

impl ProcessNode for EffectStage {
    fn name(&self) -> &str {
        "effect"
    }

    fn process(
        &mut self,
        input: Option<&[f32]>,
        frames_in: &mut usize,
        output: &mut [f32],
        frames_out: &mut usize,
    ) {
        if let Some(processor) = self.processor.as_mut() {
            if input.is_none() {
                *frames_in = 0;
            }
            processor(input, frames_in, output, frames_out, self.channels);
            return;
        }

        let Some(input) = input else {
            *frames_in = 0;
            *frames_out = 0;
            return;
        };
        let frames = (*frames_in).min(*frames_out);
        let len = frames * self.channels as usize;
        output[..len].copy_from_slice(&input[..len]);
        *frames_in = frames;
        *frames_out = frames;
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// Owner-side handle to a stream's effect stage.
///
/// The sound always has exactly one output edge: straight to the endpoint
/// when disconnected, into the stage when connected. Every rewiring happens
/// under the engine lock, so the render thread never sees a half-built
/// route.
pub struct EffectGraphNode {
    device: PlaybackDevice,
    node: NodeId,
    sound: NodeId,
    channels: u16,
    connected: bool,
    released: bool,
}

impl EffectGraphNode {
    /// Add a stage for `sound` and route the sound directly to the endpoint.
    pub fn new(device: &PlaybackDevice, sound: NodeId) -> EngineResult<Self> {
        let channels = device.channels();
        let node = device.with_engine(|engine| {
            let node = engine.add_process_node(Box::new(EffectStage::new(channels)))?;
            let endpoint = engine.endpoint();
            if let Err(err) = engine.attach_output(sound, endpoint) {
                let _ = engine.remove_node(node);
                return Err(err);
            }
            Ok(node)
        })?;
        Ok(Self {
            device: device.clone(),
            node,
            sound,
            channels,
            connected: false,
            released: false,
        })
    }

    pub fn node_id(&self) -> NodeId {
        self.node
    }

    pub fn sound_id(&self) -> NodeId {
        self.sound
    }

    /// Width of the stage, which is the engine's channel count.
    pub fn channel_count(&self) -> u16 {
        self.channels
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Route sound → stage → endpoint.
    pub fn connect(&mut self) -> EngineResult<()> {
        let (node, sound) = (self.node, self.sound);
        self.device.with_engine(|engine| route(engine, node, sound, true))?;
        self.connected = true;
        Ok(())
    }

    /// Route sound → endpoint, bypassing the stage.
    pub fn disconnect(&mut self) -> EngineResult<()> {
        let (node, sound) = (self.node, self.sound);
        self.device.with_engine(|engine| route(engine, node, sound, false))?;
        self.connected = false;
        Ok(())
    }

    /// Install or clear the processor and reroute in one critical section.
    ///
    /// The stage is connected exactly when a processor is installed.
    pub fn set_processor(&mut self, processor: Option<EffectProcessor>) -> EngineResult<()> {
        let (node, sound) = (self.node, self.sound);
        let connect = processor.is_some();
        self.device.with_engine(|engine| {
            if let Some(stage) = engine.graph_mut().process_node_mut::<EffectStage>(node) {
                stage.set_processor(processor);
            }
            route(engine, node, sound, connect)
        })?;
        self.connected = connect;
        Ok(())
    }

    /// Detach both edges and remove the stage, with the engine already locked.
    ///
    /// The sound node is left in the graph, unrouted. Safe to call twice.
    pub fn release(&mut self, engine: &mut Engine) {
        if self.released {
            return;
        }
        self.released = true;
        self.connected = false;
        let _ = engine.detach_output(self.sound);
        let _ = engine.detach_output(self.node);
        if let Err(err) = engine.remove_node(self.node) {
            log::warn!("Failed to remove effect node: {}", err);
        }
    }
}

impl Drop for EffectGraphNode {
    fn drop(&mut self) {
        if !self.released {
            let device = self.device.clone();
            device.with_engine(|engine| self.release(engine));
        }
    }
}

fn route(engine: &mut Engine, node: NodeId, sound: NodeId, connect: bool) -> EngineResult<()> {
    let endpoint = engine.endpoint();
    if connect {
        engine.attach_output(node, endpoint)?;
        engine.attach_output(sound, node)
    } else {
        engine.attach_output(sound, endpoint)?;
        engine.detach_output(node)
    }
}
