//! Agentic Studio Core
//!
//! The I/O-free half of the analysis client: everything between a raw chunk
//! of response bytes and the derived session state. Nothing here touches the
//! network, the filesystem, or a runtime, which keeps every stage testable in
//! isolation.
//!
//! ## Module Organization
//!
//! - `framer` - Newline framing across arbitrary chunk boundaries (`MessageFramer`)
//! - `decoder` - Strict JSON decoding of one record (`decode`)
//! - `event` - Role-tagged domain events and their payload types (`DomainEvent`)
//! - `classifier` - Record shape → domain event dispatch (`classify`)
//! - `session` - Session state, lifecycle and the reducer (`SessionState`, `reduce`)
//! - `error` - Core error types (`CoreError`, `DecodeFailure`)
//!
//! ## Data Flow
//!
//! ```text
//! chunk bytes ──► MessageFramer ──► decode ──► classify ──► SessionState::apply
//! ```

pub mod classifier;
pub mod decoder;
pub mod error;
pub mod event;
pub mod framer;
pub mod session;

// ── Error Types ────────────────────────────────────────────────────────
pub use error::{CoreError, CoreResult, DecodeFailure};

// ── Pipeline Stages ────────────────────────────────────────────────────
pub use classifier::classify;
pub use decoder::decode;
pub use framer::{MessageFramer, ProtocolRecord};

// ── Domain Events ──────────────────────────────────────────────────────
pub use event::{
    AgentRole, AgentStatus, CodeArtifact, ComplexityReport, DomainEvent, ErrorOrigin,
    Vulnerability,
};

// ── Session State ──────────────────────────────────────────────────────
pub use session::{
    fold_events, reduce, AnalysisMode, SessionOutcome, SessionPhase, SessionState,
    CANCELLED_MESSAGE,
};
