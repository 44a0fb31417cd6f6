//! ドメイン層のエラー型

use thiserror::Error;

/// 値オブジェクトの生成に失敗した場合のエラー
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValueObjectError {
    #[error("connection id must not be empty")]
    ConnectionIdEmpty,

    #[error("connection id is too long (max {max}, got {actual})")]
    ConnectionIdTooLong { max: usize, actual: usize },

    #[error("room code must be {min}..={max} characters (got {actual})")]
    RoomCodeLength { min: usize, max: usize, actual: usize },

    #[error("room code must be ASCII alphanumeric: '{0}'")]
    RoomCodeCharset(String),

    #[error("playback position must be finite and non-negative (got {0})")]
    InvalidPlaybackPosition(f64),

    #[error("video file name must not be empty")]
    VideoNameEmpty,

    #[error("video file name is too long (max {max}, got {actual})")]
    VideoNameTooLong { max: usize, actual: usize },

    #[error("unknown playback action: '{0}'")]
    UnknownPlaybackAction(String),
}

/// Repository 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("connection '{connection_id}' is not a member of room '{room_code}'")]
    NotAMember {
        connection_id: String,
        room_code: String,
    },

    #[error("failed to allocate a unique room code after {0} attempts")]
    RoomCodeExhausted(usize),
}

/// MessagePusher 操作のエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MessagePushError {
    #[error("connection '{0}' is not registered")]
    ClientNotFound(String),

    #[error("failed to push message: {0}")]
    PushFailed(String),
}
