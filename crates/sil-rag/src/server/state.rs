//! Application state for the HTTP server

use std::sync::Arc;

use crate::config::RagConfig;
use crate::error::Result;
use crate::pipeline::RagPipeline;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    pipeline: Arc<RagPipeline>,
}

impl AppState {
    /// Build the Ollama-backed pipeline from `config`
    pub fn new(config: RagConfig) -> Result<Self> {
        Ok(Self::from_pipeline(Arc::new(RagPipeline::from_config(config)?)))
    }

    /// Wrap an already-built pipeline
    pub fn from_pipeline(pipeline: Arc<RagPipeline>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { pipeline }),
        }
    }

    pub fn pipeline(&self) -> &Arc<RagPipeline> {
        &self.inner.pipeline
    }

    pub fn config(&self) -> &RagConfig {
        self.inner.pipeline.config()
    }
}
