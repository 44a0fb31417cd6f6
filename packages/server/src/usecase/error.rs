//! UseCase 層のエラー型
//!
//! 送信者に返すエラーの種類（`ErrorKind`）はここで決める。

use thiserror::Error;

use crate::domain::{ErrorKind, RepositoryError};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateRoomError {
    #[error("could not allocate a room code: {0}")]
    CodeUnavailable(String),
}

impl CreateRoomError {
    pub fn kind(&self) -> ErrorKind {
        ErrorKind::Internal
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JoinRoomError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("unexpected registry error: {0}")]
    Unexpected(String),
}

impl JoinRoomError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            JoinRoomError::RoomNotFound(_) => ErrorKind::RoomNotFound,
            JoinRoomError::Unexpected(_) => ErrorKind::Internal,
        }
    }
}

impl From<RepositoryError> for JoinRoomError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::RoomNotFound(code) => JoinRoomError::RoomNotFound(code),
            other => JoinRoomError::Unexpected(other.to_string()),
        }
    }
}

/// ルーム宛てメッセージの中継エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RelayError {
    #[error("room '{0}' not found")]
    RoomNotFound(String),

    #[error("connection '{connection_id}' is not a member of room '{room_code}'")]
    NotAMember {
        connection_id: String,
        room_code: String,
    },

    #[error("unexpected registry error: {0}")]
    Unexpected(String),
}

impl RelayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RelayError::RoomNotFound(_) => ErrorKind::RoomNotFound,
            RelayError::NotAMember { .. } => ErrorKind::NotAMember,
            RelayError::Unexpected(_) => ErrorKind::Internal,
        }
    }
}

impl From<RepositoryError> for RelayError {
    fn from(error: RepositoryError) -> Self {
        match error {
            RepositoryError::RoomNotFound(code) => RelayError::RoomNotFound(code),
            RepositoryError::NotAMember {
                connection_id,
                room_code,
            } => RelayError::NotAMember {
                connection_id,
                room_code,
            },
            other => RelayError::Unexpected(other.to_string()),
        }
    }
}
