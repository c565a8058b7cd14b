//! Mapping of HTTP failures onto the typed upstream errors.

use intervalcards_core::error::{IntervalCardsError, Result};
use reqwest::StatusCode;

/// Build a client with the fixed request timeout.
pub fn client_with_timeout(provider: &str, timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| IntervalCardsError::config(format!("{provider} HTTP client: {e}")))
}

/// Error for a transport-level failure (no HTTP response).
pub fn transport_error(provider: &str, e: reqwest::Error) -> IntervalCardsError {
    if e.is_timeout() {
        IntervalCardsError::Timeout(format!("{provider} request timed out"))
    } else if e.is_connect() {
        IntervalCardsError::Unavailable(format!("{provider} connection failed: {e}"))
    } else {
        IntervalCardsError::Http(format!("{provider}: {e}"))
    }
}

/// Error for a non-success HTTP status.
pub fn status_error(provider: &str, status: StatusCode, body: &str) -> IntervalCardsError {
    match status.as_u16() {
        401 | 403 => IntervalCardsError::AuthFailed(format!("{provider} rejected credentials ({status})")),
        429 => IntervalCardsError::RateLimited(format!("{provider} rate limit exceeded")),
        408 | 504 => IntervalCardsError::Timeout(format!("{provider} upstream timeout ({status})")),
        500 | 502 | 503 => IntervalCardsError::Unavailable(format!("{provider} unavailable ({status})")),
        _ => IntervalCardsError::Provider(format!("{provider} API error {status}: {body}")),
    }
}
