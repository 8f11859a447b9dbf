//! Shared handle to a running engine.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::EngineConfig;
use crate::engine::Engine;
use crate::error::EngineResult;

/// Cloneable, thread-safe handle to one [`Engine`].
///
/// The audio callback calls [`render`](Self::render); owner threads edit the
/// graph through [`with_engine`](Self::with_engine). Both take the same lock,
/// so every graph edit is atomic with respect to rendering.
#[derive(Clone)]
pub struct PlaybackDevice {
    engine: Arc<Mutex<Engine>>,
    config: EngineConfig,
}

impl PlaybackDevice {
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        let engine = Engine::new(config)?;
        Ok(Self {
            engine: Arc::new(Mutex::new(engine)),
            config,
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

    /// Run `f` with exclusive access to the engine.
    pub fn with_engine<R>(&self, f: impl FnOnce(&mut Engine) -> R) -> R {
        let mut engine = self.engine.lock();
        f(&mut engine)
    }

    /// Render interleaved f32 frames; returns frames written.
    pub fn render(&self, out: &mut [f32]) -> usize {
        self.engine.lock().render(out)
    }

    pub fn close(&self) {
        self.engine.lock().close();
    }

    pub fn is_closed(&self) -> bool {
        self.engine.lock().is_closed()
    }

    /// Whether two handles refer to the same engine.
    pub fn same_device(&self, other: &PlaybackDevice) -> bool {
        Arc::ptr_eq(&self.engine, &other.engine)
    }
}
