//! Node graph: storage, routing and traversal order.
//!
//! Every node has at most one output edge, so the graph is a forest of
//! chains flowing toward the endpoint. Nodes whose chain does not end at
//! the endpoint are kept but never rendered.

use std::sync::Arc;

use slotmap::{new_key_type, SecondaryMap, SlotMap};

use rv_ir::{AudioBuffer, ChannelMap, PullableSource, SoundSettings};

use crate::error::{EngineError, EngineResult};
use crate::node::ProcessNode;
use crate::remap::Remap;
use crate::resample::Resampler;

new_key_type! {
    /// Handle to a node in an engine graph.
    pub struct NodeId;
}

/// Called once on the render thread when a sound's source runs dry.
pub type EndHook = Box<dyn FnMut() + Send>;

pub(crate) struct SoundNode {
    pub source: Arc<dyn PullableSource>,
    pub channel_map: ChannelMap,
    pub remap: Remap,
    pub settings: SoundSettings,
    pub playing: bool,
    pub at_end: bool,
    pub on_end: Option<EndHook>,
    /// Interleaved i16 pull buffer at the source's width, sized for the
    /// most source frames one block can need.
    pub scratch: Vec<i16>,
    /// Present when the source rate differs from the engine rate.
    pub resampler: Option<Resampler>,
}

pub(crate) struct ProcessSlot {
    pub node: Box<dyn ProcessNode>,
    /// Input frames offered but not consumed on the previous block.
    pub carry: AudioBuffer,
    pub carry_frames: usize,
    /// Carry followed by this block's input.
    pub staging: AudioBuffer,
}

pub(crate) enum NodeKind {
    Endpoint,
    Sound(SoundNode),
    Process(ProcessSlot),
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Endpoint => "endpoint",
            NodeKind::Sound(_) => "sound",
            NodeKind::Process(_) => "process",
        }
    }
}

pub(crate) struct GraphNode {
    pub kind: NodeKind,
    pub output: Option<NodeId>,
    /// This block's output at the engine's channel count.
    pub buffer: AudioBuffer,
    /// Whether `buffer` carries signal this block.
    pub active: bool,
}

/// Routing state for the engine.
pub struct Graph {
    pub(crate) nodes: SlotMap<NodeId, GraphNode>,
    endpoint: NodeId,
    /// Render order (sources first, endpoint last), rebuilt on every edit.
    pub(crate) order: Vec<NodeId>,
    channels: u16,
    block_frames: usize,
}

impl Graph {
    pub(crate) fn new(channels: u16, block_frames: usize, max_nodes: usize) -> Self {
        let mut nodes = SlotMap::with_capacity_and_key(max_nodes);
        let endpoint = nodes.insert(GraphNode {
            kind: NodeKind::Endpoint,
            output: None,
            buffer: AudioBuffer::new(channels, block_frames),
            active: true,
        });
        let mut graph = Self {
            nodes,
            endpoint,
            order: Vec::with_capacity(max_nodes),
            channels,
            block_frames,
        };
        graph.rebuild_order();
        graph
    }

    pub fn endpoint(&self) -> NodeId {
        self.endpoint
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Where `id` currently sends its output.
    pub fn output_of(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id).and_then(|n| n.output)
    }

    /// Whether `id`'s chain ends at the endpoint.
    pub fn reaches_endpoint(&self, id: NodeId) -> bool {
        let mut cursor = Some(id);
        let mut hops = 0;
        while let Some(current) = cursor {
            if current == self.endpoint {
                return true;
            }
            hops += 1;
            if hops > self.nodes.len() {
                return false;
            }
            cursor = self.nodes.get(current).and_then(|n| n.output);
        }
        false
    }

    /// Current render order.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    pub(crate) fn insert(&mut self, kind: NodeKind) -> NodeId {
        let frames = self.block_frames;
        let channels = self.channels;
        self.nodes.insert(GraphNode {
            kind,
            output: None,
            buffer: AudioBuffer::new(channels, frames),
            active: false,
        })
    }

    pub(crate) fn new_process_slot(&self, node: Box<dyn ProcessNode>) -> ProcessSlot {
        ProcessSlot {
            node,
            carry: AudioBuffer::new(self.channels, self.block_frames),
            carry_frames: 0,
            staging: AudioBuffer::new(self.channels, self.block_frames * 2),
        }
    }

    /// Remove a node. Anything that fed into it is left detached.
    pub(crate) fn remove(&mut self, id: NodeId) -> EngineResult<GraphNode> {
        if id == self.endpoint {
            return Err(EngineError::EndpointFixed("removed"));
        }
        let node = self.nodes.remove(id).ok_or(EngineError::UnknownNode)?;
        for (_, other) in self.nodes.iter_mut() {
            if other.output == Some(id) {
                other.output = None;
            }
        }
        self.rebuild_order();
        Ok(node)
    }

    /// Route `from`'s output into `to`, replacing any previous edge.
    pub fn attach_output(&mut self, from: NodeId, to: NodeId) -> EngineResult<()> {
        if from == self.endpoint {
            return Err(EngineError::EndpointFixed("rerouted"));
        }
        if !self.nodes.contains_key(from) || !self.nodes.contains_key(to) {
            return Err(EngineError::UnknownNode);
        }
        if matches!(self.nodes[to].kind, NodeKind::Sound(_)) {
            return Err(EngineError::WrongNodeKind("mixing"));
        }
        // Walk downstream from `to`; meeting `from` means a loop.
        let mut cursor = Some(to);
        while let Some(current) = cursor {
            if current == from {
                return Err(EngineError::Cycle);
            }
            cursor = self.nodes[current].output;
        }
        self.nodes[from].output = Some(to);
        self.rebuild_order();
        Ok(())
    }

    /// Drop `from`'s output edge. Detaching an unrouted node is a no-op.
    pub fn detach_output(&mut self, from: NodeId) -> EngineResult<()> {
        let node = self.nodes.get_mut(from).ok_or(EngineError::UnknownNode)?;
        if node.output.take().is_some() {
            self.rebuild_order();
        }
        Ok(())
    }

    /// Reach a concrete processing node inside the graph.
    pub fn process_node_mut<T: ProcessNode + 'static>(&mut self, id: NodeId) -> Option<&mut T> {
        match &mut self.nodes.get_mut(id)?.kind {
            NodeKind::Process(slot) => slot.node.as_any_mut().downcast_mut::<T>(),
            _ => None,
        }
    }

    fn rebuild_order(&mut self) {
        let order = topological_sort(self);
        self.order.clear();
        self.order.extend(order);
    }

    /// Sum this block's active inputs of `id` into `scratch`.
    ///
    /// Returns whether any input carried signal.
    pub(crate) fn gather_inputs(&self, id: NodeId, frames: usize, scratch: &mut AudioBuffer) -> bool {
        let head = scratch.head_mut(frames);
        head.fill(0.0);
        let mut any = false;
        for (_, node) in self.nodes.iter() {
            if node.output == Some(id) && node.active {
                for (dst, src) in head.iter_mut().zip(node.buffer.head(frames)) {
                    *dst += *src;
                }
                any = true;
            }
        }
        any
    }
}

/// Topological sort via Kahn's algorithm over nodes that reach the endpoint.
///
/// Every producer appears before its consumer; the endpoint is last.
pub fn topological_sort(graph: &Graph) -> Vec<NodeId> {
    let mut in_degree: SecondaryMap<NodeId, u32> = SecondaryMap::with_capacity(graph.nodes.len());
    for (id, _) in graph.nodes.iter() {
        if graph.reaches_endpoint(id) {
            in_degree.insert(id, 0);
        }
    }
    let live: Vec<NodeId> = in_degree.keys().collect();
    for &id in &live {
        if let Some(to) = graph.nodes[id].output {
            if let Some(count) = in_degree.get_mut(to) {
                *count += 1;
            }
        }
    }

    let mut queue: Vec<NodeId> = live
        .iter()
        .copied()
        .filter(|&id| in_degree[id] == 0)
        .collect();
    let mut result = Vec::with_capacity(live.len());

    while let Some(id) = queue.pop() {
        result.push(id);
        if let Some(to) = graph.nodes[id].output {
            if let Some(count) = in_degree.get_mut(to) {
                *count -= 1;
                if *count == 0 {
                    queue.push(to);
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Passthrough;

    fn graph() -> Graph {
        Graph::new(2, 16, 16)
    }

    fn add_process(graph: &mut Graph) -> NodeId {
        let slot = graph.new_process_slot(Box::new(Passthrough::new(2)));
        graph.insert(NodeKind::Process(slot))
    }

    fn pos(order: &[NodeId], id: NodeId) -> usize {
        order.iter().position(|&n| n == id).unwrap()
    }

    #[test]
    fn endpoint_only_graph() {
        let g = graph();
        assert_eq!(g.order(), &[g.endpoint()]);
        assert_eq!(g.len(), 1);
    }

    #[test]
    fn chain_orders_producers_first() {
        let mut g = graph();
        let a = add_process(&mut g);
        let b = add_process(&mut g);
        g.attach_output(a, b).unwrap();
        g.attach_output(b, g.endpoint()).unwrap();

        let order = g.order().to_vec();
        assert_eq!(order.len(), 3);
        assert!(pos(&order, a) < pos(&order, b));
        assert_eq!(*order.last().unwrap(), g.endpoint());
    }

    #[test]
    fn unrouted_nodes_are_not_rendered() {
        let mut g = graph();
        let a = add_process(&mut g);
        let b = add_process(&mut g);
        g.attach_output(a, b).unwrap();
        assert_eq!(g.order(), &[g.endpoint()]);
        assert!(!g.reaches_endpoint(a));
    }

    #[test]
    fn attach_replaces_previous_edge() {
        let mut g = graph();
        let a = add_process(&mut g);
        let b = add_process(&mut g);
        g.attach_output(a, b).unwrap();
        g.attach_output(a, g.endpoint()).unwrap();
        assert_eq!(g.output_of(a), Some(g.endpoint()));
        assert!(!g.order().contains(&b));
    }

    #[test]
    fn cycles_are_rejected() {
        let mut g = graph();
        let a = add_process(&mut g);
        let b = add_process(&mut g);
        g.attach_output(a, b).unwrap();
        assert_eq!(g.attach_output(b, a), Err(EngineError::Cycle));
        assert_eq!(g.attach_output(a, a), Err(EngineError::Cycle));
    }

    #[test]
    fn endpoint_cannot_be_rerouted_or_removed() {
        let mut g = graph();
        let a = add_process(&mut g);
        let ep = g.endpoint();
        assert_eq!(g.attach_output(ep, a), Err(EngineError::EndpointFixed("rerouted")));
        assert!(matches!(g.remove(ep), Err(EngineError::EndpointFixed(_))));
    }

    #[test]
    fn removing_a_node_detaches_its_inputs() {
        let mut g = graph();
        let a = add_process(&mut g);
        let b = add_process(&mut g);
        g.attach_output(a, b).unwrap();
        g.attach_output(b, g.endpoint()).unwrap();
        g.remove(b).unwrap();
        assert_eq!(g.output_of(a), None);
        assert_eq!(g.order(), &[g.endpoint()]);
        assert_eq!(g.detach_output(b), Err(EngineError::UnknownNode));
    }

    #[test]
    fn detach_is_idempotent() {
        let mut g = graph();
        let a = add_process(&mut g);
        g.attach_output(a, g.endpoint()).unwrap();
        g.detach_output(a).unwrap();
        g.detach_output(a).unwrap();
        assert_eq!(g.output_of(a), None);
    }

    #[test]
    fn gather_sums_only_active_inputs() {
        let mut g = graph();
        let a = add_process(&mut g);
        let b = add_process(&mut g);
        let ep = g.endpoint();
        g.attach_output(a, ep).unwrap();
        g.attach_output(b, ep).unwrap();

        g.nodes[a].buffer.head_mut(2).copy_from_slice(&[0.25, 0.5, 0.25, 0.5]);
        g.nodes[a].active = true;
        g.nodes[b].buffer.head_mut(2).copy_from_slice(&[1.0, 1.0, 1.0, 1.0]);
        g.nodes[b].active = false;

        let mut scratch = AudioBuffer::new(2, 16);
        assert!(g.gather_inputs(ep, 2, &mut scratch));
        assert_eq!(scratch.head(2), &[0.25, 0.5, 0.25, 0.5]);

        g.nodes[a].active = false;
        assert!(!g.gather_inputs(ep, 2, &mut scratch));
        assert!(scratch.head(2).iter().all(|&s| s == 0.0));
    }

    #[test]
    fn process_node_downcast() {
        let mut g = graph();
        let a = add_process(&mut g);
        assert!(g.process_node_mut::<Passthrough>(a).is_some());
        assert!(g.process_node_mut::<Passthrough>(g.endpoint()).is_none());
    }
}
