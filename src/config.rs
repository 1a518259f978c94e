//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub dataset: DatasetConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub reports: ReportsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Remote dataset API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DatasetConfig {
    /// Resource endpoint, including the trailing `?`
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// App token sent as `X-App-Token`; empty means no header
    #[serde(default)]
    pub app_token: String,

    /// Optional request timeout. Unset means requests may wait indefinitely.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "https://health.data.ny.gov/resource/gnzp-ekau.json?".to_string()
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            app_token: String::new(),
            request_timeout_secs: None,
        }
    }
}

impl DatasetConfig {
    /// Config pointing at a custom endpoint
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Set the app token
    pub fn app_token(mut self, token: impl Into<String>) -> Self {
        self.app_token = token.into();
        self
    }
}

/// Dashboard server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8090
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Report execution configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ReportsConfig {
    /// Issue the per-gender requests together instead of one after the other
    #[serde(default)]
    pub concurrent_fetch: bool,

    /// Seed for chart slice colours
    #[serde(default = "default_color_seed")]
    pub color_seed: u64,
}

fn default_color_seed() -> u64 {
    42
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            concurrent_fetch: false,
            color_seed: default_color_seed(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Install the global tracing subscriber.
    ///
    /// `RUST_LOG` wins over the configured level.
    pub fn init(&self) {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("healthstat={},tower_http=info", self.level))
        });

        let registry = tracing_subscriber::registry().with(filter);

        if self.format == "json" {
            registry.with(tracing_subscriber::fmt::layer().json()).init();
        } else {
            registry.with(tracing_subscriber::fmt::layer()).init();
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("healthstat").join("config.toml")),
            Some(PathBuf::from("/etc/healthstat/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Dataset overrides
        if let Some(url) = var("HEALTHSTAT_BASE_URL") {
            self.dataset.base_url = url;
        }
        if let Some(token) = var("HEALTHSTAT_APP_TOKEN") {
            self.dataset.app_token = token;
        }

        // Server overrides
        if let Some(host) = var("HEALTHSTAT_HOST") {
            self.server.host = host;
        }
        if let Some(port) = var("HEALTHSTAT_PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }

        if let Some(flag) = var("HEALTHSTAT_CONCURRENT_FETCH") {
            self.reports.concurrent_fetch = flag.to_lowercase() == "true" || flag == "1";
        }

        // Logging overrides
        if let Some(level) = var("HEALTHSTAT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("HEALTHSTAT_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Healthstat Configuration
#
# Environment variables override these settings:
# - HEALTHSTAT_BASE_URL
# - HEALTHSTAT_APP_TOKEN
# - HEALTHSTAT_HOST
# - HEALTHSTAT_PORT
# - HEALTHSTAT_CONCURRENT_FETCH
# - HEALTHSTAT_LOG_LEVEL
# - HEALTHSTAT_LOG_FORMAT

[dataset]
# SPARCS hospital inpatient discharges resource
base_url = "https://health.data.ny.gov/resource/gnzp-ekau.json?"

# App token sent as X-App-Token (leave empty to send none)
app_token = ""

# Request timeout in seconds (unset = wait indefinitely)
# request_timeout_secs = 30

[server]
# Dashboard server host
host = "127.0.0.1"

# Dashboard server port
port = 8090

[reports]
# Fetch the male and female series together instead of one after the other
concurrent_fetch = false

# Seed for chart colours
color_seed = 42

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
