//! Error types for the syncwatch client.

use thiserror::Error;

/// Connection-level errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server URL cannot be used at all; retrying will not help
    #[error("Invalid server URL '{0}'")]
    InvalidUrl(String),

    /// Connection could not be established
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// An established connection was closed or broke
    #[error("Connection lost")]
    ConnectionLost,
}

/// Errors from parsing or executing a user command
#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Unknown command '{0}' (type 'help' for a list)")]
    Unknown(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("'{0}' is not a valid number of seconds")]
    InvalidSeconds(String),

    #[error("No video loaded (use 'load <PATH> [DURATION_SECS]')")]
    NoVideo,

    #[error("Already in room {0}; restart the client to switch rooms")]
    AlreadyInRoom(String),

    #[error("Still waiting for the server to answer the last create/join")]
    RoomRequestPending,

    #[error("Cannot use '{path}': {reason}")]
    File { path: String, reason: String },
}
