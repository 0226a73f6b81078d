//! Transport error types.

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur when talking to the sales endpoint.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The caller cancelled the operation. Never shown to users.
    #[error("operation cancelled")]
    Cancelled,

    /// HTTP transport error.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status or non-JSON body. `snippet` is the truncated body.
    #[error("unexpected response ({status}): {snippet}")]
    Status {
        /// HTTP status code returned by the endpoint.
        status: u16,
        /// Leading characters of the response body.
        snippet: String,
    },

    /// A JSON body did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// Reading the upload file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The endpoint answered with a structured error list.
    #[error("{}", .0.join(" | "))]
    Server(Vec<String>),

    /// The response succeeded but the expected result field is absent.
    #[error("no data.{0} in response")]
    MissingData(&'static str),
}

/// Coarse grouping used for logging and display decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Cancelled,
    Transport,
    Server,
    Protocol,
}

impl ErrorCategory {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cancelled => "cancelled",
            Self::Transport => "transport",
            Self::Server => "server",
            Self::Protocol => "protocol",
        }
    }
}

impl TransportError {
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::Cancelled => ErrorCategory::Cancelled,
            Self::Http(_) | Self::Status { .. } | Self::Decode(_) | Self::Io(_) => {
                ErrorCategory::Transport
            }
            Self::Server(_) => ErrorCategory::Server,
            Self::MissingData(_) => ErrorCategory::Protocol,
        }
    }

    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}
