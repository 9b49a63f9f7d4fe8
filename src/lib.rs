//! Agentic Studio - Streaming Analysis Client
//!
//! Client library for the Agentic Code Studio backend. It includes:
//! - Backend transport over HTTP with NDJSON response streaming
//! - The chunk stream → domain event adapter
//! - Session orchestration with incremental state observation
//! - Configuration storage, data models and utilities
//!
//! The I/O-free pipeline (framing, decoding, classification, reduction)
//! lives in the `agentic-studio-core` crate and is re-exported here.

pub mod models;
pub mod services;
pub mod state;
pub mod storage;
pub mod utils;

// ── Core Pipeline ──────────────────────────────────────────────────────
pub use agentic_studio_core::{
    classify, decode, AgentRole, AgentStatus, AnalysisMode, CodeArtifact, ComplexityReport,
    DomainEvent, ErrorOrigin, MessageFramer, ProtocolRecord, SessionOutcome, SessionPhase,
    SessionState, Vulnerability,
};

// ── Services ───────────────────────────────────────────────────────────
pub use services::analysis::{
    AnalysisClient, AnalysisClientConfig, AnalysisOrchestrator, AnalysisTransport, ChunkStream,
    TransportError,
};
pub use services::streaming::into_event_stream;

// ── Models & State ─────────────────────────────────────────────────────
pub use models::analysis::{AnalysisInputs, AnalysisRequest};
pub use models::settings::{AppConfig, SettingsUpdate};
pub use state::AppState;
pub use utils::error::{AppError, AppResult};
