//! Analysis Request Models
//!
//! User inputs for one analysis run and the per-mode request bodies sent to
//! the backend.

use agentic_studio_core::AnalysisMode;
use serde::{Deserialize, Serialize};

use crate::utils::error::{AppError, AppResult};

/// Language assumed for optimization requests when none is given.
pub const DEFAULT_LANGUAGE: &str = "python";

/// Everything a user can fill in before starting a run.
///
/// Each mode reads only the fields it needs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisInputs {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub test_input: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl AnalysisInputs {
    pub fn with_code(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..Self::default()
        }
    }
}

/// Body of `POST /analyze/fix`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixRequest {
    pub description: String,
    pub code: String,
}

/// Body of `POST /analyze/optimize`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptimizeRequest {
    pub code: String,
    pub test_input: String,
    pub language: String,
}

/// Body of `POST /analyze/security`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityRequest {
    pub code: String,
}

/// A mode-specific request, ready to send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum AnalysisRequest {
    Fix(FixRequest),
    Optimize(OptimizeRequest),
    Security(SecurityRequest),
}

impl AnalysisRequest {
    /// Build the payload for `mode` from the user's inputs.
    pub fn build(mode: AnalysisMode, inputs: &AnalysisInputs) -> Self {
        match mode {
            AnalysisMode::Fix => AnalysisRequest::Fix(FixRequest {
                description: inputs.description.clone(),
                code: inputs.code.clone(),
            }),
            AnalysisMode::Optimize => AnalysisRequest::Optimize(OptimizeRequest {
                code: inputs.code.clone(),
                test_input: inputs.test_input.clone(),
                language: inputs
                    .language
                    .clone()
                    .filter(|l| !l.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
            }),
            AnalysisMode::Security => AnalysisRequest::Security(SecurityRequest {
                code: inputs.code.clone(),
            }),
        }
    }

    pub fn mode(&self) -> AnalysisMode {
        match self {
            AnalysisRequest::Fix(_) => AnalysisMode::Fix,
            AnalysisRequest::Optimize(_) => AnalysisMode::Optimize,
            AnalysisRequest::Security(_) => AnalysisMode::Security,
        }
    }

    pub fn endpoint_path(&self) -> &'static str {
        self.mode().endpoint_path()
    }

    pub fn code(&self) -> &str {
        match self {
            AnalysisRequest::Fix(r) => &r.code,
            AnalysisRequest::Optimize(r) => &r.code,
            AnalysisRequest::Security(r) => &r.code,
        }
    }

    /// Reject requests the backend cannot do anything with.
    pub fn validate(&self) -> AppResult<()> {
        if self.code().trim().is_empty() {
            return Err(AppError::validation("code cannot be empty"));
        }
        if let AnalysisRequest::Fix(r) = self {
            if r.description.trim().is_empty() {
                return Err(AppError::validation(
                    "description cannot be empty for a fix request",
                ));
            }
        }
        Ok(())
    }
}
