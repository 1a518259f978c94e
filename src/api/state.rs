//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use crate::config::{Config, ServerConfig};
use crate::render::ChartJsRenderer;
use crate::report::ReportRunner;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Runs the dashboard reports
    pub runner: Arc<ReportRunner>,
    /// Chart configuration builder for the page
    pub renderer: ChartJsRenderer,
    /// Server configuration
    pub config: Arc<ServerConfig>,
    /// Dataset endpoint the reports query
    pub dataset_url: String,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    /// Create a new AppState
    pub fn new(runner: Arc<ReportRunner>, config: &Config) -> Self {
        let renderer = ChartJsRenderer::new(runner.config().color_seed);
        Self {
            runner,
            renderer,
            config: Arc::new(config.server.clone()),
            dataset_url: config.dataset.base_url.clone(),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
