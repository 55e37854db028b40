//! Domain Errors
//!
//! `DomainError` covers validation of domain values, `BackendError` covers the
//! ways a remote collaborator can fail. Neither knows about HTTP types.

use thiserror::Error;

/// Domain-specific errors representing invalid values
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    /// Confidence must lie within `[0, 1]`
    #[error("Invalid confidence: {0}, must be between 0.0 and 1.0")]
    InvalidConfidence(f32),

    /// Document identifiers cannot be blank
    #[error("Document ID cannot be empty")]
    EmptyDocumentId,

    /// Suggestion text cannot be blank
    #[error("Suggestion text cannot be empty")]
    EmptySuggestionText,

    /// Unknown suggestion kind received from a caller or the wire
    #[error("Invalid suggestion kind: {0}")]
    InvalidSuggestionKind(String),

    /// Configuration value rejected by validation
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Domain result type
pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Check if error is a value validation error
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            DomainError::InvalidConfidence(_)
                | DomainError::EmptyDocumentId
                | DomainError::EmptySuggestionText
                | DomainError::InvalidSuggestionKind(_)
        )
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        if self.is_validation_error() {
            ErrorCategory::Validation
        } else {
            ErrorCategory::Configuration
        }
    }
}

/// Categories of domain errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Input validation errors
    Validation,
    /// Configuration problems
    Configuration,
}

/// Failure reported by a remote collaborator (search, suggestions, history)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BackendError {
    /// The request never produced a response (DNS, connect, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// The backend answered with a non-success status
    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    /// No usable credentials, or the backend rejected them after a refresh
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// The response body did not match the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(String),
}

/// Backend result type
pub type BackendResult<T> = Result<T, BackendError>;

impl BackendError {
    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network(message.into())
    }

    pub fn server<S: Into<String>>(status: u16, message: S) -> Self {
        Self::Server {
            status,
            message: message.into(),
        }
    }

    /// Transient failures that a caller may retry on its own schedule
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(_) => true,
            Self::Server { status, .. } => *status >= 500 || *status == 429,
            Self::Unauthorized(_) | Self::Decode(_) => false,
        }
    }

    /// Short label used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Server { .. } => "server",
            Self::Unauthorized(_) => "unauthorized",
            Self::Decode(_) => "decode",
        }
    }
}
