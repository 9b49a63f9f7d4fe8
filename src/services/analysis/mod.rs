//! Analysis Service
//!
//! Transport abstraction, the HTTP backend client, and the orchestrator that
//! runs a session over them.

pub mod client;
pub mod orchestrator;
pub mod transport;

pub use client::{AnalysisClient, AnalysisClientConfig};
pub use orchestrator::AnalysisOrchestrator;
pub use transport::{AnalysisTransport, ChunkStream, TransportError};
