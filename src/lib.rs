//! # Healthstat
//!
//! Public health statistics dashboard for the New York SPARCS hospital
//! inpatient discharge dataset.
//!
//! ## Modules
//!
//! - [`soql`]: Clause builder for the dataset API's query parameters
//! - [`client`]: HTTP client that executes a query request
//! - [`report`]: The fixed dashboard reports and their typed results
//! - [`render`]: Chart.js configurations and the dashboard page
//! - [`api`]: HTTP server for the page and the report data
//! - [`config`]: TOML and environment configuration
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use healthstat::client::DatasetClient;
//! use healthstat::config::Config;
//! use healthstat::report::ReportRunner;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env();
//!     let client = Arc::new(DatasetClient::new(config.dataset.clone())?);
//!     let runner = ReportRunner::new(client, config.reports.clone());
//!
//!     for point in runner.cancer_by_age_group().await? {
//!         println!("{}: {}", point.label, point.value);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod render;
pub mod report;
pub mod soql;

pub use api::{build_router, serve, ApiError, AppState};

pub use client::{DatasetClient, FetchError, Record, RecordSource};

pub use config::{Config, ConfigError, DatasetConfig, LoggingConfig, ReportsConfig, ServerConfig};

pub use render::{ChartConfig, ChartJsRenderer, ChartRenderer, ColorSource, SeededColors};

pub use report::{
    ChartPoint, Gender, GenderComparison, ReportData, ReportError, ReportKind, ReportResult,
    ReportRunner,
};

pub use soql::{ClauseError, ClauseResult, Fragment, Predicate, QueryRequest, SelectExpr};
