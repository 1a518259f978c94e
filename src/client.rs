//! Dataset REST API Client
//!
//! HTTP client for the tabular dataset API. Turns an ordered list of clause
//! fragments into a GET request and decodes the JSON array of records.

use crate::config::DatasetConfig;
use crate::soql::Fragment;
use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;

/// One response row, columns in response order
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Header carrying the app token
pub const APP_TOKEN_HEADER: &str = "X-App-Token";

/// Anything that can execute a query request and return records
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch the records matching the given fragments
    async fn fetch(&self, fragments: &[Fragment]) -> Result<Vec<Record>, FetchError>;
}

/// Dataset REST API client
pub struct DatasetClient {
    client: Client,
    config: DatasetConfig,
}

impl DatasetClient {
    /// Create a new dataset client with the given configuration
    pub fn new(config: DatasetConfig) -> Result<Self, FetchError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(std::time::Duration::from_secs(secs));
        }
        let client = builder.build().map_err(FetchError::Transport)?;

        if config.app_token.is_empty() {
            tracing::warn!("No app token configured, requests will be throttled");
        }

        Ok(Self { client, config })
    }

    /// Get the current configuration
    pub fn config(&self) -> &DatasetConfig {
        &self.config
    }

    /// Full request URL: base endpoint, then each fragment followed by `&`
    pub fn request_url(&self, fragments: &[Fragment]) -> String {
        let mut url = self.config.base_url.clone();
        for fragment in fragments {
            url.push_str(fragment.as_str());
            url.push('&');
        }
        url
    }
}

#[async_trait]
impl RecordSource for DatasetClient {
    async fn fetch(&self, fragments: &[Fragment]) -> Result<Vec<Record>, FetchError> {
        let url = self.request_url(fragments);

        tracing::debug!(
            url = %url,
            query = %fragments.iter().map(|f| f.decoded()).collect::<Vec<_>>().join(" & "),
            "Fetching dataset records"
        );

        let mut request = self.client.get(&url);
        if !self.config.app_token.is_empty() {
            request = request.header(APP_TOKEN_HEADER, &self.config.app_token);
        }

        let response = request.send().await.map_err(FetchError::Transport)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status: status.as_u16(),
                message: text,
            });
        }

        let body = response.text().await.map_err(FetchError::Transport)?;
        let records = decode_records(&body)?;

        tracing::debug!(records = records.len(), "Dataset request complete");
        Ok(records)
    }
}

/// Decode a response body into records.
///
/// The body must be a JSON array whose elements are all objects.
pub fn decode_records(body: &str) -> Result<Vec<Record>, FetchError> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|e| FetchError::MalformedResponse(format!("invalid JSON: {}", e)))?;

    let items = match value {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(FetchError::MalformedResponse(format!(
                "expected an array of records, got {}",
                json_type(&other)
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| match item {
            serde_json::Value::Object(record) => Ok(record),
            other => Err(FetchError::MalformedResponse(format!(
                "record {} is {}, not an object",
                i,
                json_type(&other)
            ))),
        })
        .collect()
}

fn json_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

// ============================================
// Errors
// ============================================

/// Errors that can occur when talking to the dataset API
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl FetchError {
    /// Network or HTTP status failure, as opposed to a bad body
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Status { .. })
    }
}
