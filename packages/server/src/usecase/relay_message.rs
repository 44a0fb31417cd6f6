//! UseCase: ルーム宛てメッセージの中継
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayMessageUseCase::relay_video_info() / relay_video_action()
//!
//! ### なぜこのテストが必要か
//! - 送信者以外の同じルームのメンバーにだけ届くことを保証
//! - 非メンバーからの中継が誰にも届かないことを確認
//! - 中継した内容が途中参加者向けに記録されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：動画情報・再生操作の中継
//! - 異常系：存在しないルーム、非メンバーからの送信
//! - エッジケース：送信者しかいないルーム

use std::sync::Arc;

use syncwatch_shared::time::Clock;

use crate::domain::{
    ConnectionId, MessagePusher, Notification, PlaybackAction, PlaybackPosition, RoomCode,
    RoomRepository, VideoFileInfo,
};

use super::error::RelayError;

/// 中継のユースケース
pub struct RelayMessageUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    clock: Arc<dyn Clock>,
}

impl RelayMessageUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
            clock,
        }
    }

    /// ホストの動画情報を中継
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<ConnectionId>)` - 中継先
    /// * `Err(RelayError)` - ルームが存在しない、または送信者がメンバーでない
    pub async fn relay_video_info(
        &self,
        sender: &ConnectionId,
        room_code: &RoomCode,
        video: VideoFileInfo,
    ) -> Result<Vec<ConnectionId>, RelayError> {
        let targets = self
            .repository
            .relay_video_info(room_code, sender, video.clone())
            .await?;
        tracing::info!(
            "Relaying video info '{}' ({} bytes) in room '{}' to {} peer(s)",
            video.name(),
            video.size(),
            room_code,
            targets.len()
        );

        self.fan_out(targets.clone(), &Notification::HostVideoInfo { video })
            .await;
        Ok(targets)
    }

    /// 再生操作を中継
    pub async fn relay_video_action(
        &self,
        sender: &ConnectionId,
        room_code: &RoomCode,
        action: PlaybackAction,
        position: PlaybackPosition,
        is_playing: Option<bool>,
    ) -> Result<Vec<ConnectionId>, RelayError> {
        let targets = self
            .repository
            .relay_playback(
                room_code,
                sender,
                action,
                position,
                is_playing,
                self.clock.now_millis(),
            )
            .await?;
        tracing::debug!(
            "Relaying {} at {:.3}s in room '{}' to {} peer(s)",
            action,
            position.seconds(),
            room_code,
            targets.len()
        );

        self.fan_out(
            targets.clone(),
            &Notification::VideoAction {
                action,
                position,
                is_playing,
            },
        )
        .await;
        Ok(targets)
    }

    async fn fan_out(&self, targets: Vec<ConnectionId>, notification: &Notification) {
        if let Err(e) = self.message_pusher.broadcast(targets, notification).await {
            tracing::warn!("Failed to relay message: {}", e);
        }
    }
}
