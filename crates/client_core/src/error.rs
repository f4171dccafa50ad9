//! Error taxonomy for the client core.

use std::fmt;

use thiserror::Error;

/// Command categories guarded by an in-flight flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Upload,
    Delete,
    Query,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Upload => "upload",
            Self::Delete => "delete",
            Self::Query => "query",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("backend unreachable: {0}")]
    Unreachable(String),
    #[error("request timed out")]
    Timeout,
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_decode() {
            Self::Malformed(err.to_string())
        } else if let Some(status) = err.status() {
            Self::Status {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            Self::Unreachable(err.to_string())
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("{0} already in flight")]
    Busy(RequestKind),
    #[error("deleting {0} requires confirmation")]
    Unconfirmed(String),
    #[error("unreadable document: {0}")]
    Document(String),
    #[error("background task failed: {0}")]
    Task(String),
    #[error("stale document load for generation {received} (current {current})")]
    StaleResponse { received: u64, current: u64 },
}

impl ClientError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.into())
    }
}
