//! Error types for feed loading

use thiserror::Error;

use crate::model::FeedLoadState;

/// Errors surfaced by the feed controller, endpoint and cache.
///
/// The type is `Clone` so the same error can be both returned to the caller
/// and kept in the page state as `load_error`.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FeedError {
    /// A load was requested while another one was already active.
    #[error("Illegal load state {state:?}")]
    IllegalState { state: FeedLoadState },

    /// The load was superseded or cancelled by its launcher.
    #[error("Feed load cancelled")]
    Cancelled,

    /// Transport-level failure talking to the feed server.
    #[error("Network error: {0}")]
    Network(String),

    /// The feed server rejected the API key.
    #[error("Unauthorized: the feed server rejected the API key")]
    Unauthorized,

    /// Any other non-success HTTP status.
    #[error("Feed server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body could not be decoded.
    #[error("Failed to decode feed response: {0}")]
    Decode(String),

    /// Reading or writing the on-disk feed cache failed.
    #[error("Feed cache error: {0}")]
    Cache(String),
}

impl FeedError {
    pub fn is_cancellation(&self) -> bool {
        matches!(self, FeedError::Cancelled)
    }

    /// Whether retrying the same request may succeed.
    pub fn is_recoverable(&self) -> bool {
        match self {
            FeedError::Network(_) | FeedError::Cache(_) => true,
            FeedError::Status { status, .. } => *status >= 500 || *status == 429,
            FeedError::IllegalState { .. }
            | FeedError::Cancelled
            | FeedError::Unauthorized
            | FeedError::Decode(_) => false,
        }
    }

    /// Short message for the error banner.
    pub fn user_message(&self) -> String {
        match self {
            FeedError::IllegalState { .. } => "A feed load is already in progress.".to_string(),
            FeedError::Cancelled => "Feed load cancelled.".to_string(),
            FeedError::Network(_) => "Could not reach the feed server. Press r to retry.".to_string(),
            FeedError::Unauthorized => "Feed server rejected the API key. Check SONGFEED_API_KEY.".to_string(),
            FeedError::Status { status: 429, .. } => "Rate limited. Please wait a moment.".to_string(),
            FeedError::Status { status, .. } => format!("Feed server error ({}). Press r to retry.", status),
            FeedError::Decode(_) => "The feed server sent an unreadable response.".to_string(),
            FeedError::Cache(msg) => format!("Feed cache error: {}", msg),
        }
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(error: reqwest::Error) -> Self {
        if error.is_decode() {
            FeedError::Decode(error.to_string())
        } else if let Some(status) = error.status() {
            FeedError::Status {
                status: status.as_u16(),
                message: error.to_string(),
            }
        } else {
            FeedError::Network(error.to_string())
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(error: serde_json::Error) -> Self {
        FeedError::Decode(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_cancelled_is_cancellation() {
        assert!(FeedError::Cancelled.is_cancellation());
        assert!(!FeedError::Network("reset".into()).is_cancellation());
        assert!(!FeedError::IllegalState { state: FeedLoadState::Loading }.is_cancellation());
    }

    #[test]
    fn server_errors_are_recoverable_client_errors_are_not() {
        let server = FeedError::Status { status: 503, message: "down".into() };
        let client = FeedError::Status { status: 404, message: "missing".into() };
        assert!(server.is_recoverable());
        assert!(!client.is_recoverable());
        assert!(!FeedError::Unauthorized.is_recoverable());
    }

    #[test]
    fn illegal_state_message_names_the_state() {
        let error = FeedError::IllegalState { state: FeedLoadState::Continuing };
        assert_eq!(error.to_string(), "Illegal load state Continuing");
    }
}
