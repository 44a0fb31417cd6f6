//! UseCase: ルーム参加処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - JoinRoomUseCase::execute() メソッド
//! - 参加者への応答、既存メンバーへの通知、途中参加者への状態の送信
//!
//! ### なぜこのテストが必要か
//! - 存在しないルームへの参加が副作用なしにエラーになることを保証
//! - 二重参加でメンバーが増えず、`userJoined` も再送されないことを確認
//! - 途中参加者が次の操作を待たずに現在の再生状態を受け取れることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：参加と通知
//! - 異常系：存在しないルーム
//! - エッジケース：二重参加、再生中のルームへの途中参加

use std::sync::Arc;

use syncwatch_shared::time::Clock;

use crate::domain::{
    ConnectionId, JoinOutcome, MessagePusher, Notification, RoomCode, RoomRepository,
};

use super::error::JoinRoomError;

/// ルーム参加のユースケース
pub struct JoinRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
    /// 再生位置の推定に使う単調時計
    clock: Arc<dyn Clock>,
}

impl JoinRoomUseCase {
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

    /// ルーム参加を実行
    ///
    /// 参加者には `roomJoined` を返す。新規の参加であれば、既存メンバーへ
    /// `userJoined` を送り、参加者にはホストの動画情報と現在の再生状態を送る。
    pub async fn execute(
        &self,
        connection_id: &ConnectionId,
        room_code: &RoomCode,
    ) -> Result<JoinOutcome, JoinRoomError> {
        let outcome = self
            .repository
            .join_room(room_code, connection_id.clone())
            .await?;

        self.push(
            connection_id,
            &Notification::RoomJoined {
                room_code: room_code.clone(),
            },
        )
        .await;

        if !outcome.newly_joined {
            tracing::debug!(
                "'{}' is already a member of room '{}'",
                connection_id,
                room_code
            );
            return Ok(outcome);
        }
        tracing::info!("'{}' joined room '{}'", connection_id, room_code);

        if let Err(e) = self
            .message_pusher
            .broadcast(
                outcome.others.clone(),
                &Notification::UserJoined {
                    connection_id: connection_id.clone(),
                },
            )
            .await
        {
            tracing::warn!("Failed to broadcast userJoined: {}", e);
        }

        if let Some(video) = &outcome.video {
            self.push(
                connection_id,
                &Notification::HostVideoInfo {
                    video: video.clone(),
                },
            )
            .await;
        }
        if let Some(snapshot) = &outcome.playback {
            self.push(
                connection_id,
                &Notification::PlaybackState {
                    position: snapshot.position_at(self.clock.now_millis()),
                    is_playing: snapshot.is_playing,
                },
            )
            .await;
        }

        Ok(outcome)
    }

    async fn push(&self, connection_id: &ConnectionId, notification: &Notification) {
        if let Err(e) = self
            .message_pusher
            .push_to(connection_id, notification)
            .await
        {
            tracing::warn!("Failed to push to '{}': {}", connection_id, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{PlaybackAction, PlaybackPosition, Timestamp, VideoFileInfo},
        infrastructure::dto::websocket::ServerMessage,
        usecase::testing::{connect, setup},
    };
    use syncwatch_shared::time::ManualClock;

    #[tokio::test]
    async fn test_join_room_success() {
        // テスト項目: 参加者は roomJoined を、既存メンバーは userJoined を受け取る
        // given (前提条件):
        let (repository, pusher) = setup();
        let mut host = connect(&pusher, "host").await;
        let mut guest = connect(&pusher, "guest").await;
        let room_code = repository
            .create_room(host.id.clone(), Timestamp::new(0))
            .await
            .unwrap();
        let usecase = JoinRoomUseCase::new(
            repository.clone(),
            pusher.clone(),
            Arc::new(ManualClock::new(0)),
        );

        // when (操作):
        let outcome = usecase.execute(&guest.id, &room_code).await.unwrap();

        // then (期待する結果):
        assert!(outcome.newly_joined);
        assert_eq!(
            guest.drain(),
            vec![ServerMessage::RoomJoined {
                room_code: room_code.as_str().to_string()
            }]
        );
        assert_eq!(
            host.drain(),
            vec![ServerMessage::UserJoined {
                connection_id: "guest".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_join_nonexistent_room() {
        // テスト項目: 存在しないルームへの参加はエラーで、誰にも送信しない
        // given (前提条件):
        let (repository, pusher) = setup();
        let mut guest = connect(&pusher, "guest").await;
        let usecase = JoinRoomUseCase::new(
            repository.clone(),
            pusher.clone(),
            Arc::new(ManualClock::new(0)),
        );
        let room_code = RoomCode::new("NOPE00".to_string()).unwrap();

        // when (操作):
        let result = usecase.execute(&guest.id, &room_code).await;

        // then (期待する結果):
        assert_eq!(result, Err(JoinRoomError::RoomNotFound("NOPE00".to_string())));
        assert!(guest.drain().is_empty());
        assert!(repository.remove_connection(&guest.id).await.is_empty());
    }

    #[tokio::test]
    async fn test_join_twice_does_not_renotify() {
        // テスト項目: 二重参加では roomJoined のみ再送し、userJoined は送らない
        // given (前提条件):
        let (repository, pusher) = setup();
        let mut host = connect(&pusher, "host").await;
        let mut guest = connect(&pusher, "guest").await;
        let room_code = repository
            .create_room(host.id.clone(), Timestamp::new(0))
            .await
            .unwrap();
        let usecase = JoinRoomUseCase::new(
            repository.clone(),
            pusher.clone(),
            Arc::new(ManualClock::new(0)),
        );
        usecase.execute(&guest.id, &room_code).await.unwrap();
        host.drain();
        guest.drain();

        // when (操作):
        let outcome = usecase.execute(&guest.id, &room_code).await.unwrap();

        // then (期待する結果):
        assert!(!outcome.newly_joined);
        assert_eq!(guest.drain().len(), 1);
        assert!(host.drain().is_empty());
        let room = repository.get_room(&room_code).await.unwrap();
        assert_eq!(room.member_count(), 2);
    }

    #[tokio::test]
    async fn test_late_joiner_receives_current_state() {
        // テスト項目: 再生中のルームに途中参加すると動画情報と推定位置を受け取る
        // given (前提条件):
        let (repository, pusher) = setup();
        let host = connect(&pusher, "host").await;
        let mut late = connect(&pusher, "late").await;
        let clock = ManualClock::new(10_000);
        let room_code = repository
            .create_room(host.id.clone(), Timestamp::new(0))
            .await
            .unwrap();
        repository
            .relay_video_info(
                &room_code,
                &host.id,
                VideoFileInfo::new("movie.mp4".to_string(), 50_000_000).unwrap(),
            )
            .await
            .unwrap();
        repository
            .relay_playback(
                &room_code,
                &host.id,
                PlaybackAction::Play,
                PlaybackPosition::new(3.2).unwrap(),
                None,
                10_000,
            )
            .await
            .unwrap();
        let usecase = JoinRoomUseCase::new(repository.clone(), pusher.clone(), Arc::new(clock.clone()));

        // when (操作):
        clock.advance(2_000);
        usecase.execute(&late.id, &room_code).await.unwrap();

        // then (期待する結果):
        let messages = late.drain();
        assert_eq!(messages.len(), 3);
        assert_eq!(
            messages[1],
            ServerMessage::HostVideoInfo {
                name: "movie.mp4".to_string(),
                size: 50_000_000
            }
        );
        match &messages[2] {
            ServerMessage::PlaybackState { time, is_playing } => {
                assert!((time - 5.2).abs() < 1e-9);
                assert!(*is_playing);
            }
            other => panic!("unexpected message: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_join_paused_room_does_not_extrapolate() {
        // テスト項目: 一時停止中のルームでは記録された位置をそのまま送る
        // given (前提条件):
        let (repository, pusher) = setup();
        let host = connect(&pusher, "host").await;
        let mut late = connect(&pusher, "late").await;
        let clock = ManualClock::new(0);
        let room_code = repository
            .create_room(host.id.clone(), Timestamp::new(0))
            .await
            .unwrap();
        repository
            .relay_playback(
                &room_code,
                &host.id,
                PlaybackAction::Pause,
                PlaybackPosition::new(42.0).unwrap(),
                None,
                0,
            )
            .await
            .unwrap();
        let usecase = JoinRoomUseCase::new(repository.clone(), pusher.clone(), Arc::new(clock.clone()));

        // when (操作):
        clock.advance(60_000);
        usecase.execute(&late.id, &room_code).await.unwrap();

        // then (期待する結果):
        let messages = late.drain();
        assert_eq!(
            messages.last(),
            Some(&ServerMessage::PlaybackState {
                time: 42.0,
                is_playing: false
            })
        );
    }
}
