//! Errors as the feed and uploader keep them for display.

use serde::Serialize;
use tally_transport::{ErrorCategory, TransportError};
use thiserror::Error;

/// A surfaced failure. Cloneable so status snapshots can carry it.
///
/// Cancellation is never stored as a `FeedError`; superseded work is dropped
/// silently instead.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("{message}")]
pub struct FeedError {
    pub category: ErrorCategory,
    pub message: String,
}

impl From<&TransportError> for FeedError {
    fn from(err: &TransportError) -> Self {
        Self {
            category: err.category(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_category_and_message() {
        let err = FeedError::from(&TransportError::Server(vec!["a".into(), "b".into()]));
        assert_eq!(err.category, ErrorCategory::Server);
        assert_eq!(err.to_string(), "a | b");

        let err = FeedError::from(&TransportError::MissingData("salesPage"));
        assert_eq!(err.category, ErrorCategory::Protocol);
        assert_eq!(err.message, "no data.salesPage in response");
    }
}
