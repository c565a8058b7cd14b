//! Unified error types for IntervalCards.

use thiserror::Error;

/// Result type alias using IntervalCardsError.
pub type Result<T> = std::result::Result<T, IntervalCardsError>;

#[derive(Error, Debug)]
pub enum IntervalCardsError {
    // Input errors, reported back to the user with a specific message
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    // Store errors
    #[error("Store error: {0}")]
    Store(String),

    // Completion provider errors
    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Upstream unavailable: {0}")]
    Unavailable(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Parse error: {0}")]
    Parse(String),

    // Generation errors
    #[error("No unique words generated after {attempts} attempt(s)")]
    GenerationExhausted { attempts: u32 },

    // Channel errors
    #[error("Channel error: {0}")]
    Channel(String),

    // Config errors
    #[error("Configuration error: {0}")]
    Config(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("{0}")]
    Other(String),
}

/// Coarse classification used at the conversation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Duplicate,
    Upstream,
    GenerationExhausted,
}

impl IntervalCardsError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn duplicate(msg: impl Into<String>) -> Self {
        Self::Duplicate(msg.into())
    }

    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    pub fn channel(msg: impl Into<String>) -> Self {
        Self::Channel(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Duplicate(_) => ErrorKind::Duplicate,
            Self::GenerationExhausted { .. } => ErrorKind::GenerationExhausted,
            _ => ErrorKind::Upstream,
        }
    }

    /// True for failures of the store, the completion collaborator, or the transport.
    pub fn is_upstream(&self) -> bool {
        self.kind() == ErrorKind::Upstream
    }
}
