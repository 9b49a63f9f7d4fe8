//! Core Error Types
//!
//! Error types for the dependency-free half of the workspace. The application
//! crate wraps these and adds transport and storage variants.

use thiserror::Error;

/// Maximum number of characters of a raw record kept in a [`DecodeFailure`].
pub const MAX_RAW_PREVIEW_CHARS: usize = 200;

/// Core error type for the Agentic Studio workspace.
#[derive(Error, Debug)]
pub enum CoreError {
    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// A protocol record could not be decoded
    #[error(transparent)]
    Decode(#[from] DecodeFailure),
}

/// Result type alias for core errors
pub type CoreResult<T> = Result<T, CoreError>;

impl CoreError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

impl From<CoreError> for String {
    fn from(err: CoreError) -> String {
        err.to_string()
    }
}

/// A protocol record whose text is not valid JSON.
///
/// Carries the offending text (truncated) and the parser's description of the
/// problem. A decode failure never terminates a session; the record is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Failed to decode record: {reason} (record: {raw})")]
pub struct DecodeFailure {
    /// The raw record text, truncated to [`MAX_RAW_PREVIEW_CHARS`].
    pub raw: String,
    /// Parser error description.
    pub reason: String,
}

impl DecodeFailure {
    /// Build a failure from the full record text and a parse error.
    pub fn new(raw: &str, reason: impl Into<String>) -> Self {
        let raw = if raw.chars().count() > MAX_RAW_PREVIEW_CHARS {
            let mut preview: String = raw.chars().take(MAX_RAW_PREVIEW_CHARS).collect();
            preview.push_str("...");
            preview
        } else {
            raw.to_string()
        };
        Self {
            raw,
            reason: reason.into(),
        }
    }
}
