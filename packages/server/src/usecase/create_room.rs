//! UseCase: ルーム作成処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - CreateRoomUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 作成者がホストかつ唯一のメンバーになり、`roomCreated` を受け取ることを保証
//! - コードを確保できなかった場合にルームが作られないことを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：ルーム作成と応答
//! - 異常系：コードの確保に失敗

use std::sync::Arc;

use syncwatch_shared::time::get_unix_timestamp_millis;

use crate::domain::{ConnectionId, MessagePusher, Notification, RoomCode, RoomRepository, Timestamp};

use super::error::CreateRoomError;

/// ルーム作成のユースケース
pub struct CreateRoomUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl CreateRoomUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// ルームを作成し、作成者に `roomCreated` を返す
    ///
    /// # Returns
    ///
    /// * `Ok(RoomCode)` - 作成したルームのコード
    /// * `Err(CreateRoomError)` - 一意なコードを確保できなかった
    pub async fn execute(&self, host: &ConnectionId) -> Result<RoomCode, CreateRoomError> {
        let created_at = Timestamp::new(get_unix_timestamp_millis());

        let room_code = self
            .repository
            .create_room(host.clone(), created_at)
            .await
            .map_err(|e| CreateRoomError::CodeUnavailable(e.to_string()))?;
        tracing::info!("Room '{}' created by '{}'", room_code, host);

        let notification = Notification::RoomCreated {
            room_code: room_code.clone(),
        };
        if let Err(e) = self.message_pusher.push_to(host, &notification).await {
            tracing::warn!("Failed to send roomCreated to '{}': {}", host, e);
        }

        Ok(room_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MockMessagePusher, RoomCodeFactory},
        infrastructure::{dto::websocket::ServerMessage, repository::InMemoryRoomRepository},
        usecase::testing::{connect, setup},
    };

    #[tokio::test]
    async fn test_create_room_success() {
        // テスト項目: 作成者がホストかつ唯一のメンバーになり、コードを受け取る
        // given (前提条件):
        let (repository, pusher) = setup();
        let mut host = connect(&pusher, "host").await;
        let usecase = CreateRoomUseCase::new(repository.clone(), pusher.clone());

        // when (操作):
        let room_code = usecase.execute(&host.id).await.unwrap();

        // then (期待する結果):
        assert_eq!(
            host.drain(),
            vec![ServerMessage::RoomCreated {
                room_code: room_code.as_str().to_string()
            }]
        );
        let room = repository.get_room(&room_code).await.unwrap();
        assert_eq!(room.host, host.id);
        assert_eq!(room.member_count(), 1);
    }

    #[tokio::test]
    async fn test_create_room_code_unavailable() {
        // テスト項目: コードを確保できない場合はエラーになり、何も送信しない
        // given (前提条件):
        let fixed = RoomCodeFactory::generate();
        let repository = Arc::new(InMemoryRoomRepository::with_code_generator(Box::new(
            move || fixed.clone(),
        )));
        let first = ConnectionId::new("first".to_string()).unwrap();
        repository
            .create_room(first, Timestamp::new(0))
            .await
            .unwrap();

        let mut pusher = MockMessagePusher::new();
        pusher.expect_push_to().never();
        let usecase = CreateRoomUseCase::new(repository.clone(), Arc::new(pusher));

        // when (操作):
        let second = ConnectionId::new("second".to_string()).unwrap();
        let result = usecase.execute(&second).await;

        // then (期待する結果):
        assert!(matches!(result, Err(CreateRoomError::CodeUnavailable(_))));
        assert_eq!(repository.count_rooms().await, 1);
        assert!(repository.remove_connection(&second).await.is_empty());
    }
}
