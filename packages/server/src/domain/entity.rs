//! エンティティ
//!
//! `Room` は同期視聴セッション 1 つを表す。メンバーは集合として保持するため、
//! 同じ接続が二重に登録されることはない。

use std::collections::HashSet;

use super::value_object::{
    ConnectionId, PlaybackAction, PlaybackPosition, RoomCode, Timestamp, VideoFileInfo,
};

/// ルームで最後に中継された再生操作
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackSnapshot {
    pub action: PlaybackAction,
    pub position: PlaybackPosition,
    pub is_playing: bool,
    /// 記録した時点のサーバー単調時刻（ミリ秒）
    pub recorded_at_millis: u64,
}

impl PlaybackSnapshot {
    /// `now_millis` 時点の推定再生位置
    ///
    /// 再生中であれば記録時点からの経過時間を加算する。
    pub fn position_at(&self, now_millis: u64) -> PlaybackPosition {
        if self.is_playing {
            self.position
                .advanced_by_millis(now_millis.saturating_sub(self.recorded_at_millis))
        } else {
            self.position
        }
    }
}

/// ルーム
#[derive(Debug, Clone)]
pub struct Room {
    pub code: RoomCode,
    /// 作成者。退出しても再選出しない。
    pub host: ConnectionId,
    pub members: HashSet<ConnectionId>,
    pub created_at: Timestamp,
    /// ホストが最後に通知した動画ファイル
    pub video: Option<VideoFileInfo>,
    pub playback: Option<PlaybackSnapshot>,
}

impl Room {
    /// ホストを唯一のメンバーとして新しいルームを作成
    pub fn new(code: RoomCode, host: ConnectionId, created_at: Timestamp) -> Self {
        let mut members = HashSet::new();
        members.insert(host.clone());
        Self {
            code,
            host,
            members,
            created_at,
            video: None,
            playback: None,
        }
    }

    /// メンバーを追加。新規に追加された場合 `true`。
    pub fn add_member(&mut self, connection_id: ConnectionId) -> bool {
        self.members.insert(connection_id)
    }

    /// メンバーを削除。所属していた場合 `true`。
    pub fn remove_member(&mut self, connection_id: &ConnectionId) -> bool {
        self.members.remove(connection_id)
    }

    pub fn is_member(&self, connection_id: &ConnectionId) -> bool {
        self.members.contains(connection_id)
    }

    pub fn is_host(&self, connection_id: &ConnectionId) -> bool {
        &self.host == connection_id
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn member_count(&self) -> usize {
        self.members.len()
    }

    /// 指定した接続以外のメンバー（ID 順）
    pub fn other_members(&self, exclude: &ConnectionId) -> Vec<ConnectionId> {
        let mut others: Vec<ConnectionId> = self
            .members
            .iter()
            .filter(|id| *id != exclude)
            .cloned()
            .collect();
        others.sort();
        others
    }

    /// 全メンバー（ID 順）
    pub fn sorted_members(&self) -> Vec<ConnectionId> {
        let mut members: Vec<ConnectionId> = self.members.iter().cloned().collect();
        members.sort();
        members
    }

    /// 動画情報を記録する。ホスト以外からの通知は記録しない。
    pub fn record_video(&mut self, sender: &ConnectionId, video: VideoFileInfo) -> bool {
        if !self.is_host(sender) {
            return false;
        }
        self.video = Some(video);
        true
    }

    /// 中継した再生操作を記録する
    ///
    /// `seek` は `is_playing` が省略された場合、直前の再生状態を引き継ぐ。
    pub fn record_playback(
        &mut self,
        action: PlaybackAction,
        position: PlaybackPosition,
        is_playing: Option<bool>,
        now_millis: u64,
    ) {
        let is_playing = match action {
            PlaybackAction::Play => true,
            PlaybackAction::Pause => false,
            PlaybackAction::Seek => is_playing.unwrap_or_else(|| {
                self.playback
                    .as_ref()
                    .map(|snapshot| snapshot.is_playing)
                    .unwrap_or(false)
            }),
        };
        self.playback = Some(PlaybackSnapshot {
            action,
            position,
            is_playing,
            recorded_at_millis: now_millis,
        });
    }
}
