//! Domain Event Types
//!
//! The normalized, role-tagged events produced by the classifier and folded
//! into session state by the reducer. Every event carries exactly one role.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ============================================================================
// Roles
// ============================================================================

/// The producing-agent category of a domain event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgentRole {
    Developer,
    SecurityEngineer,
    Optimizer,
    Critic,
    Tester,
    Benchmarker,
    OptimizationCritic,
    Error,
}

impl AgentRole {
    /// All roles, in the order the classifier checks their record keys.
    pub const ALL: [AgentRole; 8] = [
        AgentRole::Developer,
        AgentRole::SecurityEngineer,
        AgentRole::Optimizer,
        AgentRole::Critic,
        AgentRole::Tester,
        AgentRole::Benchmarker,
        AgentRole::OptimizationCritic,
        AgentRole::Error,
    ];

    /// Top-level key identifying this role in a protocol record.
    pub fn record_key(self) -> &'static str {
        match self {
            AgentRole::Developer => "developer",
            AgentRole::SecurityEngineer => "security_engineer",
            AgentRole::Optimizer => "optimizer",
            AgentRole::Critic => "critic",
            AgentRole::Tester => "tester",
            AgentRole::Benchmarker => "benchmarker",
            AgentRole::OptimizationCritic => "optimization_critic",
            AgentRole::Error => "error",
        }
    }

    /// Look up a role by its record key.
    pub fn from_record_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.record_key() == key)
    }

    /// Human-readable label shown in the timeline.
    pub fn label(self) -> &'static str {
        match self {
            AgentRole::Developer => "Developer",
            AgentRole::SecurityEngineer => "Security Engineer",
            AgentRole::Optimizer => "Optimizer",
            AgentRole::Critic => "Critic",
            AgentRole::Tester => "Tester",
            AgentRole::Benchmarker => "Benchmarker",
            AgentRole::OptimizationCritic => "Optimization Critic",
            AgentRole::Error => "Error",
        }
    }
}

impl fmt::Display for AgentRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ============================================================================
// Payload Types
// ============================================================================

/// Where an `Error` event came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorOrigin {
    /// An explicit error record sent by the backend.
    Upstream,
    /// A synthetic event for a connection failure or cancelled run.
    Transport,
}

/// Review or test verdict reported by critic, tester and benchmarker agents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AgentStatus {
    Approved,
    Rejected,
    Passed,
    Failed,
    Start,
    Other(String),
}

impl AgentStatus {
    pub fn as_str(&self) -> &str {
        match self {
            AgentStatus::Approved => "approved",
            AgentStatus::Rejected => "rejected",
            AgentStatus::Passed => "passed",
            AgentStatus::Failed => "failed",
            AgentStatus::Start => "start",
            AgentStatus::Other(s) => s,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, AgentStatus::Approved | AgentStatus::Passed)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, AgentStatus::Rejected | AgentStatus::Failed)
    }
}

impl From<&str> for AgentStatus {
    fn from(s: &str) -> Self {
        match s {
            "approved" => AgentStatus::Approved,
            "rejected" => AgentStatus::Rejected,
            "passed" => AgentStatus::Passed,
            "failed" => AgentStatus::Failed,
            "start" => AgentStatus::Start,
            other => AgentStatus::Other(other.to_string()),
        }
    }
}

impl From<String> for AgentStatus {
    fn from(s: String) -> Self {
        AgentStatus::from(s.as_str())
    }
}

impl From<AgentStatus> for String {
    fn from(status: AgentStatus) -> String {
        status.as_str().to_string()
    }
}

impl fmt::Display for AgentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding from a security audit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vulnerability {
    /// "High", "Medium", or "Low"
    #[serde(default)]
    pub severity: String,
    /// Vulnerability category (e.g. "SQL Injection")
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub description: String,
}

/// Time/space complexity before and after optimization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplexityReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_space: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimized_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimized_space: Option<String>,
}

/// Generated code together with the role that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeArtifact {
    pub code: String,
    pub produced_by: AgentRole,
}

// ============================================================================
// Domain Event
// ============================================================================

/// A classified record from the analysis stream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum DomainEvent {
    Developer {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        iteration: Option<u32>,
    },
    SecurityEngineer {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
        #[serde(default)]
        vulnerabilities: Vec<Vulnerability>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        iteration: Option<u32>,
    },
    Optimizer {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        code: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        complexity: Option<ComplexityReport>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        iteration: Option<u32>,
    },
    Critic {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<AgentStatus>,
    },
    Tester {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<AgentStatus>,
    },
    Benchmarker {
        message: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        results: Option<Value>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<AgentStatus>,
    },
    OptimizationCritic {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<AgentStatus>,
    },
    Error {
        message: String,
        origin: ErrorOrigin,
    },
}

impl DomainEvent {
    /// An error record sent by the backend.
    pub fn upstream_error(message: impl Into<String>) -> Self {
        DomainEvent::Error {
            message: message.into(),
            origin: ErrorOrigin::Upstream,
        }
    }

    /// A synthetic error for a failed or cancelled transport.
    pub fn transport_error(message: impl Into<String>) -> Self {
        DomainEvent::Error {
            message: message.into(),
            origin: ErrorOrigin::Transport,
        }
    }

    pub fn role(&self) -> AgentRole {
        match self {
            DomainEvent::Developer { .. } => AgentRole::Developer,
            DomainEvent::SecurityEngineer { .. } => AgentRole::SecurityEngineer,
            DomainEvent::Optimizer { .. } => AgentRole::Optimizer,
            DomainEvent::Critic { .. } => AgentRole::Critic,
            DomainEvent::Tester { .. } => AgentRole::Tester,
            DomainEvent::Benchmarker { .. } => AgentRole::Benchmarker,
            DomainEvent::OptimizationCritic { .. } => AgentRole::OptimizationCritic,
            DomainEvent::Error { .. } => AgentRole::Error,
        }
    }

    /// Timeline label. Transport errors read "System Error" so they are
    /// distinguishable from errors reported by the backend.
    pub fn label(&self) -> &'static str {
        match self {
            DomainEvent::Error {
                origin: ErrorOrigin::Transport,
                ..
            } => "System Error",
            other => other.role().label(),
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            DomainEvent::Developer { message, .. }
            | DomainEvent::SecurityEngineer { message, .. }
            | DomainEvent::Optimizer { message, .. }
            | DomainEvent::Critic { message, .. }
            | DomainEvent::Tester { message, .. }
            | DomainEvent::Benchmarker { message, .. }
            | DomainEvent::Error { message, .. } => Some(message),
            DomainEvent::OptimizationCritic { message, .. } => message.as_deref(),
        }
    }

    /// Non-empty code carried by this event.
    pub fn code(&self) -> Option<&str> {
        let code = match self {
            DomainEvent::Developer { code, .. }
            | DomainEvent::SecurityEngineer { code, .. }
            | DomainEvent::Optimizer { code, .. } => code.as_deref(),
            _ => None,
        };
        code.filter(|c| !c.is_empty())
    }

    pub fn code_artifact(&self) -> Option<CodeArtifact> {
        self.code().map(|code| CodeArtifact {
            code: code.to_string(),
            produced_by: self.role(),
        })
    }

    pub fn complexity(&self) -> Option<&ComplexityReport> {
        match self {
            DomainEvent::Optimizer { complexity, .. } => complexity.as_ref(),
            _ => None,
        }
    }

    pub fn status(&self) -> Option<&AgentStatus> {
        match self {
            DomainEvent::Critic { status, .. }
            | DomainEvent::Tester { status, .. }
            | DomainEvent::Benchmarker { status, .. }
            | DomainEvent::OptimizationCritic { status, .. } => status.as_ref(),
            _ => None,
        }
    }

    pub fn vulnerabilities(&self) -> &[Vulnerability] {
        match self {
            DomainEvent::SecurityEngineer {
                vulnerabilities, ..
            } => vulnerabilities,
            _ => &[],
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, DomainEvent::Error { .. })
    }
}
