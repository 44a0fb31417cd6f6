//! 接続へ送る通知
//!
//! UseCase はワイヤーフォーマットを知らずにこの型で通知内容を組み立てる。
//! JSON への変換は Infrastructure 層の MessagePusher が行う。

use super::value_object::{ConnectionId, PlaybackAction, PlaybackPosition, RoomCode, VideoFileInfo};

/// 送信者に返すエラーの種類
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    RoomNotFound,
    NotAMember,
    InvalidPayload,
    /// ルームコードを確保できないなど、リクエスト内容に依らない失敗
    Internal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Notification {
    /// ルーム作成の応答（受信者がホストになる）
    RoomCreated { room_code: RoomCode },
    /// 参加の応答
    RoomJoined { room_code: RoomCode },
    /// 既存メンバーへの参加通知
    UserJoined { connection_id: ConnectionId },
    /// 残ったメンバーへの退出通知
    UserLeft { connection_id: ConnectionId },
    HostVideoInfo { video: VideoFileInfo },
    VideoAction {
        action: PlaybackAction,
        position: PlaybackPosition,
        is_playing: Option<bool>,
    },
    /// 途中参加者に送る現在の再生状態
    PlaybackState {
        position: PlaybackPosition,
        is_playing: bool,
    },
    Error { kind: ErrorKind, message: String },
}

impl Notification {
    pub fn error(kind: ErrorKind, message: impl Into<String>) -> Self {
        Notification::Error {
            kind,
            message: message.into(),
        }
    }
}
