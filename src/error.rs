//! Error taxonomy for a single poll iteration.

use std::fmt;

/// Coarse classification of a [`WatchError`], used as a structured log field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Decode,
    Schema,
    UnknownStatus,
    Delivery,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport => write!(f, "transport"),
            Self::Decode => write!(f, "decode"),
            Self::Schema => write!(f, "schema"),
            Self::UnknownStatus => write!(f, "unknown_status"),
            Self::Delivery => write!(f, "delivery"),
        }
    }
}

/// Everything that can go wrong inside one iteration of the poll loop.
///
/// All variants are recoverable: the supervisor turns them into a failure
/// notification and tries again after the next sleep.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WatchError {
    /// Connection failure, timeout, redirect loop, or unreadable body.
    #[error("request to status endpoint failed: {0}")]
    Transport(String),

    /// The endpoint answered with a non-2xx status.
    #[error("status endpoint is unavailable: HTTP {status}")]
    HttpStatus { status: u16 },

    /// The body was not valid JSON.
    #[error("response body is not valid JSON: {0}")]
    Decode(String),

    /// The decoded response does not have the expected shape.
    #[error("{0}")]
    Schema(String),

    /// A work item carried a status outside the documented set.
    #[error("undocumented review status: {0:?}")]
    UnknownStatus(String),

    /// The notification could not be handed to Telegram.
    #[error("failed to send message to Telegram: {0}")]
    Delivery(String),
}

impl WatchError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) | Self::HttpStatus { .. } => ErrorKind::Transport,
            Self::Decode(_) => ErrorKind::Decode,
            Self::Schema(_) => ErrorKind::Schema,
            Self::UnknownStatus(_) => ErrorKind::UnknownStatus,
            Self::Delivery(_) => ErrorKind::Delivery,
        }
    }
}
