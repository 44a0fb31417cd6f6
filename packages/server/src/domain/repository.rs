//! Repository trait 定義
//!
//! ルームレジストリへのデータアクセスのインターフェース。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。
//!
//! 各メソッドは 1 回の呼び出しで完結するアトミックな操作として実装すること。
//! 例えば「メンバーかどうかの確認」と「中継先の取得」を分けて呼ぶと、その間に
//! 切断処理が割り込む可能性があるため、1 つのメソッドにまとめている。

use async_trait::async_trait;

use super::{
    ConnectionId, PlaybackAction, PlaybackPosition, PlaybackSnapshot, RepositoryError, Room,
    RoomCode, Timestamp, VideoFileInfo,
};

/// join の結果
#[derive(Debug, Clone, PartialEq)]
pub struct JoinOutcome {
    /// 今回の呼び出しで新規にメンバーになった場合 `true`
    pub newly_joined: bool,
    /// 参加者以外のメンバー
    pub others: Vec<ConnectionId>,
    pub video: Option<VideoFileInfo>,
    pub playback: Option<PlaybackSnapshot>,
}

/// 切断によって接続が抜けたルーム 1 件分の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room_code: RoomCode,
    /// 残ったメンバー（ルームが削除された場合は空）
    pub remaining: Vec<ConnectionId>,
    pub room_deleted: bool,
}

#[async_trait]
pub trait RoomRepository: Send + Sync {
    /// 一意なコードでルームを作成し、`host` を唯一のメンバーにする
    async fn create_room(
        &self,
        host: ConnectionId,
        created_at: Timestamp,
    ) -> Result<RoomCode, RepositoryError>;

    /// ルームに参加（冪等）
    async fn join_room(
        &self,
        room_code: &RoomCode,
        connection_id: ConnectionId,
    ) -> Result<JoinOutcome, RepositoryError>;

    /// 送信者がメンバーであることを確認してホストの動画情報を記録し、中継先を返す
    async fn relay_video_info(
        &self,
        room_code: &RoomCode,
        sender: &ConnectionId,
        video: VideoFileInfo,
    ) -> Result<Vec<ConnectionId>, RepositoryError>;

    /// 送信者がメンバーであることを確認して再生操作を記録し、中継先を返す
    async fn relay_playback(
        &self,
        room_code: &RoomCode,
        sender: &ConnectionId,
        action: PlaybackAction,
        position: PlaybackPosition,
        is_playing: Option<bool>,
        now_millis: u64,
    ) -> Result<Vec<ConnectionId>, RepositoryError>;

    /// 接続を全ルームから取り除き、空になったルームを削除する
    async fn remove_connection(&self, connection_id: &ConnectionId) -> Vec<Departure>;

    async fn get_room(&self, room_code: &RoomCode) -> Option<Room>;

    /// 全ルーム（コード順）
    async fn get_rooms(&self) -> Vec<Room>;

    async fn count_rooms(&self) -> usize;
}
