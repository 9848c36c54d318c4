//! API module for the audio-scribe service
//!
//! Exposes the upload and processing endpoints consumed by the UI layer.

use anyhow::Result;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::Config;
use crate::pipeline::Pipeline;

pub mod handlers;
pub mod models;
pub mod server;

/// API server for handling REST requests
pub struct ApiServer {
    pipeline: Arc<Pipeline>,
    config: Arc<Config>,
    port: u16,
}

impl ApiServer {
    /// Create a new API server
    pub fn new(pipeline: Arc<Pipeline>, config: Arc<Config>, port: u16) -> Self {
        Self {
            pipeline,
            config,
            port,
        }
    }

    /// Start the API server in the background
    pub fn start_background(self) -> JoinHandle<Result<()>> {
        tokio::spawn(async move { self.start().await })
    }

    /// Start the API server
    pub async fn start(self) -> Result<()> {
        info!("🚀 Starting API server on port {}", self.port);

        server::start_http_server(self.pipeline, self.config, self.port).await
    }
}
