//! Uniform result of handling one event.

use intervalcards_core::error::{ErrorKind, IntervalCardsError};
use intervalcards_core::types::UserStatus;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    Ok,
    ValidationError,
    NotFound,
    Duplicate,
    UpstreamError,
    GenerationExhausted,
}

impl From<&IntervalCardsError> for ResponseStatus {
    fn from(err: &IntervalCardsError) -> Self {
        match err.kind() {
            ErrorKind::Validation => Self::ValidationError,
            ErrorKind::NotFound => Self::NotFound,
            ErrorKind::Duplicate => Self::Duplicate,
            ErrorKind::Upstream => Self::UpstreamError,
            ErrorKind::GenerationExhausted => Self::GenerationExhausted,
        }
    }
}

/// What happened, as reported to the caller. `message` is the text sent to the user.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct HandlerOutcome {
    pub success: bool,
    pub status: ResponseStatus,
    pub message: String,
    pub next_status: UserStatus,
}

impl HandlerOutcome {
    pub fn ok(next_status: UserStatus, message: impl Into<String>) -> Self {
        Self {
            success: true,
            status: ResponseStatus::Ok,
            message: message.into(),
            next_status,
        }
    }

    pub fn failed(status: ResponseStatus, next_status: UserStatus, message: impl Into<String>) -> Self {
        Self {
            success: false,
            status,
            message: message.into(),
            next_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_error() {
        assert_eq!(
            ResponseStatus::from(&IntervalCardsError::duplicate("cat")),
            ResponseStatus::Duplicate
        );
        assert_eq!(
            ResponseStatus::from(&IntervalCardsError::Timeout("30s".into())),
            ResponseStatus::UpstreamError
        );
        assert_eq!(
            ResponseStatus::from(&IntervalCardsError::GenerationExhausted { attempts: 3 }),
            ResponseStatus::GenerationExhausted
        );
    }

    #[test]
    fn test_outcome_serializes_snake_case() {
        let outcome = HandlerOutcome::failed(ResponseStatus::NotFound, UserStatus::RemoveWord, "x");
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["status"], "not_found");
        assert_eq!(json["next_status"], "remove_word");
        assert_eq!(json["success"], false);
    }
}
