//! Error types for launchpad operations.
//!
//! Defines the error taxonomy for each subsystem:
//! - Platform operations (identity, ownership, existence, status transitions)
//! - AI content generation (upstream failures, malformed completions)
//! - The AI response cache (never surfaced to callers)
//! - LLM API interactions

use thiserror::Error;

use crate::storage::StorageError;

/// Errors surfaced by the mutating platform operations.
///
/// Every variant maps onto an HTTP-style status class through
/// [`PlatformError::status_code`].
#[derive(Debug, Error)]
pub enum PlatformError {
    #[error("Unauthorized: no authenticated user")]
    Unauthorized,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("{0} not found")]
    NotFound(String),

    #[error("Invalid status transition from '{from}' to '{to}'")]
    InvalidTransition { from: String, to: String },

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

impl From<StorageError> for PlatformError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Conflict(msg) => PlatformError::Conflict(msg),
            StorageError::NotFound(row) => PlatformError::NotFound(row),
            other => PlatformError::Storage(other),
        }
    }
}

impl PlatformError {
    /// HTTP-style status class for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            PlatformError::Unauthorized => 401,
            PlatformError::Forbidden(_) => 403,
            PlatformError::NotFound(_) => 404,
            PlatformError::InvalidInput(_) => 400,
            PlatformError::InvalidTransition { .. } | PlatformError::Conflict(_) => 409,
            PlatformError::Storage(_) => 500,
        }
    }

    pub(crate) fn not_found(what: &str, id: impl std::fmt::Display) -> Self {
        PlatformError::NotFound(format!("{} '{}'", what, id))
    }
}

/// Result type alias for platform operations.
pub type PlatformResult<T> = Result<T, PlatformError>;

/// Errors that can occur while generating AI-assisted content.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Text generation service unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Could not parse generated content: {0}")]
    GenerationParseError(String),
}

impl From<LlmError> for GenerationError {
    fn from(err: LlmError) -> Self {
        GenerationError::UpstreamUnavailable(err.to_string())
    }
}

/// Errors from the AI response cache.
///
/// These are logged and swallowed by the content generator; a cache failure
/// never turns a successful generation into a failed one.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("AI cache unavailable: {0}")]
    Unavailable(String),
}

impl From<StorageError> for CacheError {
    fn from(err: StorageError) -> Self {
        CacheError::Unavailable(err.to_string())
    }
}

/// Errors that can occur during LLM operations.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(String),

    #[error("Failed to parse LLM response: {0}")]
    ParseError(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("API error ({code}): {message}")]
    ApiError { code: u16, message: String },

    #[error("LLM request timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    #[error("LLM response contained no content")]
    EmptyResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PlatformError::Unauthorized.status_code(), 401);
        assert_eq!(PlatformError::Forbidden("x".into()).status_code(), 403);
        assert_eq!(PlatformError::NotFound("x".into()).status_code(), 404);
        assert_eq!(PlatformError::InvalidInput("x".into()).status_code(), 400);
        assert_eq!(
            PlatformError::InvalidTransition {
                from: "verified".into(),
                to: "in_review".into()
            }
            .status_code(),
            409
        );
        assert_eq!(
            PlatformError::Storage(StorageError::Backend("down".into())).status_code(),
            500
        );
    }

    #[test]
    fn test_storage_conflict_becomes_conflict() {
        let err: PlatformError = StorageError::Conflict("dup".into()).into();
        assert!(matches!(err, PlatformError::Conflict(_)));

        let err: PlatformError = StorageError::Backend("down".into()).into();
        assert!(matches!(err, PlatformError::Storage(_)));
    }

    #[test]
    fn test_missing_row_becomes_not_found() {
        let err: PlatformError = StorageError::NotFound("users.id 'abc'".into()).into();
        assert_eq!(err.status_code(), 404);
        assert_eq!(err.to_string(), "users.id 'abc' not found");
    }

    #[test]
    fn test_llm_error_becomes_upstream_unavailable() {
        let err: GenerationError = LlmError::Timeout { seconds: 30 }.into();
        match err {
            GenerationError::UpstreamUnavailable(msg) => assert!(msg.contains("30 seconds")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_not_found_message() {
        let err = PlatformError::not_found("Project", "abc");
        assert_eq!(err.to_string(), "Project 'abc' not found");
    }
}
