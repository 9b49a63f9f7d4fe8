//! Session State and Reducer
//!
//! One analysis run is modelled as a [`SessionState`]: an append-only event
//! timeline plus two projections (latest code artifact, latest complexity
//! report) that are updated incrementally as each event is folded in.
//!
//! The reducer knows nothing about transport or framing. Lifecycle fields
//! (`run_id`, timestamps, phase) are set by the caller that drives the run.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::event::{AgentRole, CodeArtifact, ComplexityReport, DomainEvent};

/// Message of the synthetic error appended when a run is cancelled.
pub const CANCELLED_MESSAGE: &str = "Analysis cancelled";

// ============================================================================
// Analysis Mode
// ============================================================================

/// The kind of analysis requested from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisMode {
    /// Bug fix: developer, critic, tester
    Fix,
    /// Optimization: optimizer, critic, benchmarker
    Optimize,
    /// Security audit: security engineer, critic, tester
    Security,
}

impl AnalysisMode {
    pub fn as_str(self) -> &'static str {
        match self {
            AnalysisMode::Fix => "fix",
            AnalysisMode::Optimize => "optimize",
            AnalysisMode::Security => "security",
        }
    }

    /// Backend path for this mode, relative to the backend base URL.
    pub fn endpoint_path(self) -> &'static str {
        match self {
            AnalysisMode::Fix => "/analyze/fix",
            AnalysisMode::Optimize => "/analyze/optimize",
            AnalysisMode::Security => "/analyze/security",
        }
    }
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AnalysisMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "fix" => Ok(AnalysisMode::Fix),
            "optimize" => Ok(AnalysisMode::Optimize),
            "security" => Ok(AnalysisMode::Security),
            other => Err(CoreError::validation(format!(
                "Unknown analysis mode: '{}'. Expected 'fix', 'optimize', or 'security'",
                other
            ))),
        }
    }
}

// ============================================================================
// Lifecycle
// ============================================================================

/// Idle → Streaming → Settled
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Idle,
    Streaming,
    Settled,
}

/// How a settled session ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionOutcome {
    /// The transport signalled end of stream.
    Completed,
    /// The transport or connection failed.
    Failed { message: String },
    /// The caller cancelled the run.
    Cancelled,
}

// ============================================================================
// Session State
// ============================================================================

/// Derived state of one analysis run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Identifier of the run that produced this state
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<AnalysisMode>,
    pub phase: SessionPhase,
    /// Authoritative timeline, in arrival order
    pub events: Vec<DomainEvent>,
    /// Most recent non-empty code artifact
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_code: Option<CodeArtifact>,
    /// Most recent complete complexity report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub latest_complexity: Option<ComplexityReport>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<SessionOutcome>,
    /// RFC 3339 timestamp of the run start
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<String>,
    /// RFC 3339 timestamp of settlement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settled_at: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard everything from a previous run and enter `Streaming`.
    pub fn begin(
        &mut self,
        run_id: impl Into<String>,
        mode: AnalysisMode,
        started_at: impl Into<String>,
    ) {
        *self = Self {
            run_id: Some(run_id.into()),
            mode: Some(mode),
            phase: SessionPhase::Streaming,
            started_at: Some(started_at.into()),
            ..Self::default()
        };
    }

    /// Fold one event into the state.
    ///
    /// The event is always appended. `latest_code` is replaced when the event
    /// carries non-empty code; `latest_complexity` is replaced as a whole when
    /// the event carries a complexity report. Other events leave both
    /// projections untouched.
    pub fn apply(&mut self, event: DomainEvent) {
        if let Some(artifact) = event.code_artifact() {
            self.latest_code = Some(artifact);
        }
        if let Some(report) = event.complexity() {
            self.latest_complexity = Some(report.clone());
        }
        self.events.push(event);
    }

    /// Settle after a normal end of stream.
    pub fn settle_completed(&mut self, settled_at: impl Into<String>) {
        self.settle(SessionOutcome::Completed, settled_at.into());
    }

    /// Append one synthetic transport error and settle as failed.
    pub fn settle_failed(&mut self, message: impl Into<String>, settled_at: impl Into<String>) {
        if self.is_settled() {
            return;
        }
        let message = message.into();
        self.apply(DomainEvent::transport_error(message.clone()));
        self.settle(SessionOutcome::Failed { message }, settled_at.into());
    }

    /// Append one synthetic cancellation error and settle as cancelled.
    pub fn settle_cancelled(&mut self, settled_at: impl Into<String>) {
        if self.is_settled() {
            return;
        }
        self.apply(DomainEvent::transport_error(CANCELLED_MESSAGE));
        self.settle(SessionOutcome::Cancelled, settled_at.into());
    }

    fn settle(&mut self, outcome: SessionOutcome, settled_at: String) {
        if self.is_settled() {
            return;
        }
        self.phase = SessionPhase::Settled;
        self.outcome = Some(outcome);
        self.settled_at = Some(settled_at);
    }

    pub fn is_settled(&self) -> bool {
        self.phase == SessionPhase::Settled
    }

    /// Vulnerabilities reported by the most recent security engineer event.
    pub fn vulnerability_count(&self) -> usize {
        self.events
            .iter()
            .rev()
            .find(|e| e.role() == AgentRole::SecurityEngineer)
            .map_or(0, |e| e.vulnerabilities().len())
    }
}

/// Functional form of [`SessionState::apply`].
pub fn reduce(mut state: SessionState, event: DomainEvent) -> SessionState {
    state.apply(event);
    state
}

/// Fold a sequence of events into a fresh state.
pub fn fold_events(events: impl IntoIterator<Item = DomainEvent>) -> SessionState {
    events.into_iter().fold(SessionState::new(), reduce)
}
