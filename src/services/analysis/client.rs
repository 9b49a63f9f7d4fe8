//! Analysis Client
//!
//! HTTP client for the analysis backend. Posts a mode-specific JSON request
//! and exposes the NDJSON response body as a raw chunk stream.

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use serde::Deserialize;

use super::transport::{AnalysisTransport, ChunkStream, TransportError};
use crate::models::analysis::AnalysisRequest;
use crate::models::settings::AppConfig;

/// Configuration for the analysis client.
#[derive(Debug, Clone)]
pub struct AnalysisClientConfig {
    /// Backend base URL, e.g. `http://localhost:8000`.
    pub base_url: String,
    /// Overall request timeout, body included; `None` lets a live stream run
    /// as long as the backend keeps it open.
    pub request_timeout: Option<Duration>,
    /// Connection establishment timeout.
    pub connect_timeout: Duration,
}

impl Default for AnalysisClientConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for AnalysisClientConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            base_url: config.backend_url.clone(),
            request_timeout: (config.request_timeout_secs > 0)
                .then(|| Duration::from_secs(config.request_timeout_secs)),
            connect_timeout: Duration::from_secs(config.connect_timeout_secs),
        }
    }
}

/// Response of `GET /`.
#[derive(Debug, Clone, Deserialize)]
struct HealthResponse {
    message: String,
}

/// HTTP transport for analysis runs.
pub struct AnalysisClient {
    client: reqwest::Client,
    config: AnalysisClientConfig,
}

impl AnalysisClient {
    /// Creates a new client with the given configuration.
    pub fn with_config(config: AnalysisClientConfig) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().connect_timeout(config.connect_timeout);
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Creates a client wrapping an existing reqwest::Client.
    pub fn with_reqwest_client(client: reqwest::Client, config: AnalysisClientConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &AnalysisClientConfig {
        &self.config
    }

    /// Full URL for a backend path.
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Checks that the backend is reachable.
    ///
    /// Sends GET `{base_url}/` and returns the backend's status message.
    pub async fn health_check(&self) -> Result<String, TransportError> {
        let response = self.client.get(self.endpoint("/")).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let health: HealthResponse = response
            .json()
            .await
            .map_err(|e| TransportError::Stream(format!("Invalid health response: {}", e)))?;
        Ok(health.message)
    }
}

#[async_trait]
impl AnalysisTransport for AnalysisClient {
    async fn open(&self, request: &AnalysisRequest) -> Result<ChunkStream, TransportError> {
        let url = self.endpoint(request.endpoint_path());
        tracing::debug!(url = %url, mode = %request.mode(), "Posting analysis request");

        let response = self.client.post(&url).json(request).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        if status == reqwest::StatusCode::NO_CONTENT || response.content_length() == Some(0) {
            return Err(TransportError::MissingBody);
        }

        let chunks = response
            .bytes_stream()
            .map(|item| item.map_err(TransportError::from));
        Ok(Box::pin(chunks))
    }
}

// ============================================================================
// Tests
// ============================================================================
