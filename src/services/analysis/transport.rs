//! Analysis Transport
//!
//! The seam between the orchestrator and whatever delivers response bytes.
//! `AnalysisClient` implements it over HTTP; tests substitute in-memory
//! transports.

use std::pin::Pin;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::Stream;
use thiserror::Error;

use crate::models::analysis::AnalysisRequest;

/// Ordered stream of raw response chunks.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<Bytes, TransportError>> + Send>>;

/// Errors raised while opening or reading a response stream.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// Connection could not be established or was lost.
    #[error("Network error: {0}")]
    Network(String),

    /// Request exceeded the configured timeout.
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Backend answered with a non-success status.
    #[error("HTTP error {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Backend answered without a body to stream.
    #[error("No response body")]
    MissingBody,

    /// Reading the body failed mid-stream.
    #[error("Stream read error: {0}")]
    Stream(String),

    /// The transport was aborted by its owner.
    #[error("Request cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout(err.to_string())
        } else if err.is_connect() {
            TransportError::Network(err.to_string())
        } else if err.is_body() || err.is_decode() {
            TransportError::Stream(err.to_string())
        } else {
            TransportError::Network(err.to_string())
        }
    }
}

/// Opens a streamed analysis response.
#[async_trait]
pub trait AnalysisTransport: Send + Sync {
    /// Send `request` and return its body as a chunk stream.
    ///
    /// Errors before the first byte (connection, status, missing body) are
    /// returned here; errors while reading surface as stream items.
    async fn open(&self, request: &AnalysisRequest) -> Result<ChunkStream, TransportError>;
}
