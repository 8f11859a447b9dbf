//! Processing node trait for per-frame stages spliced into the graph.

use core::any::Any;

/// A stage with one input bus and one output bus.
///
/// Buffers are interleaved f32 at the engine's channel count. `input` is
/// `None` when nothing upstream is active; the node still runs so it can
/// flush tails. Both frame counts are in/out: on entry they hold what is
/// offered and what fits, on return what was consumed and what was written.
pub trait ProcessNode: Send {
    fn name(&self) -> &str;

    fn process(
        &mut self,
        input: Option<&[f32]>,
        frames_in: &mut usize,
        output: &mut [f32],
        frames_out: &mut usize,
    );

    /// Downcast hook so owners can reach their concrete node in the graph.
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Copies input to output unchanged.
pub struct Passthrough {
    channels: usize,
}

impl Passthrough {
    pub fn new(channels: u16) -> Self {
        Self {
            channels: channels as usize,
        }
    }
}

impl ProcessNode for Passthrough {
    fn name(&self) -> &str {
        "passthrough"
    }

    fn process(
        &mut self,
        input: Option<&[f32]>,
        frames_in: &mut usize,
        output: &mut [f32],
        frames_out: &mut usize,
    ) {
        let Some(input) = input else {
            *frames_in = 0;
            *frames_out = 0;
            return;
        };
        let n = (*frames_in).min(*frames_out);
        let len = n * self.channels;
        output[..len].copy_from_slice(&input[..len]);
        *frames_in = n;
        *frames_out = n;
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passthrough_leaves_buffer_unchanged() {
        let mut node = Passthrough::new(2);
        let input = [0.5f32, -0.3, 0.8, -0.1];
        let mut output = [0.0f32; 4];
        let (mut fin, mut fout) = (2, 2);
        node.process(Some(&input), &mut fin, &mut output, &mut fout);
        assert_eq!(output, input);
        assert_eq!((fin, fout), (2, 2));
    }

    #[test]
    fn passthrough_without_input_writes_nothing() {
        let mut node = Passthrough::new(1);
        let mut output = [9.0f32; 2];
        let (mut fin, mut fout) = (2, 2);
        node.process(None, &mut fin, &mut output, &mut fout);
        assert_eq!((fin, fout), (0, 0));
        assert_eq!(output, [9.0, 9.0]);
    }
}
