//! UseCase: 切断処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - DisconnectClientUseCase::execute() メソッド
//!
//! ### なぜこのテストが必要か
//! - 切断した接続が全ルームから取り除かれることを保証
//! - 残ったメンバーに `userLeft` が届くことを確認
//! - 最後のメンバーが抜けたルームが削除されることを確認
//!
//! ### どのような状況を想定しているか
//! - 正常系：メンバーの切断と通知
//! - エッジケース：最後のメンバーの切断、どのルームにも属さない接続の切断

use std::sync::Arc;

use crate::domain::{ConnectionId, Departure, MessagePusher, Notification, RoomRepository};

/// 切断のユースケース
pub struct DisconnectClientUseCase {
    /// Repository（データアクセス層の抽象化）
    repository: Arc<dyn RoomRepository>,
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl DisconnectClientUseCase {
    pub fn new(
        repository: Arc<dyn RoomRepository>,
        message_pusher: Arc<dyn MessagePusher>,
    ) -> Self {
        Self {
            repository,
            message_pusher,
        }
    }

    /// 切断を実行
    ///
    /// # Returns
    ///
    /// 接続が抜けたルームごとの結果
    pub async fn execute(&self, connection_id: &ConnectionId) -> Vec<Departure> {
        // 1. MessagePusher から登録解除（以降この接続には送信しない）
        self.message_pusher.unregister_client(connection_id).await;

        // 2. Repository 経由で全ルームから削除
        let departures = self.repository.remove_connection(connection_id).await;

        // 3. 残ったメンバーに通知
        let notification = Notification::UserLeft {
            connection_id: connection_id.clone(),
        };
        for departure in departures.iter().filter(|d| !d.room_deleted) {
            if let Err(e) = self
                .message_pusher
                .broadcast(departure.remaining.clone(), &notification)
                .await
            {
                tracing::warn!(
                    "Failed to broadcast userLeft in room '{}': {}",
                    departure.room_code,
                    e
                );
            }
        }

        departures
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{MockMessagePusher, Timestamp},
        infrastructure::{dto::websocket::ServerMessage, repository::InMemoryRoomRepository},
        usecase::testing::{connect, setup},
    };

    #[tokio::test]
    async fn test_disconnect_notifies_remaining_members() {
        // テスト項目: 残ったメンバーに userLeft が届く
        // given (前提条件):
        let (repository, pusher) = setup();
        let host = connect(&pusher, "host").await;
        let mut guest = connect(&pusher, "guest").await;
        let room_code = repository
            .create_room(host.id.clone(), Timestamp::new(0))
            .await
            .unwrap();
        repository
            .join_room(&room_code, guest.id.clone())
            .await
            .unwrap();
        let usecase = DisconnectClientUseCase::new(repository.clone(), pusher.clone());

        // when (操作):
        let departures = usecase.execute(&host.id).await;

        // then (期待する結果):
        assert_eq!(departures.len(), 1);
        assert!(!departures[0].room_deleted);
        assert_eq!(
            guest.drain(),
            vec![ServerMessage::UserLeft {
                connection_id: "host".to_string()
            }]
        );
        assert!(repository.get_room(&room_code).await.is_some());
    }

    #[tokio::test]
    async fn test_disconnect_last_member_deletes_room() {
        // テスト項目: 最後のメンバーの切断でルームが削除され、通知は送られない
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let host = ConnectionId::new("host".to_string()).unwrap();
        let room_code = repository
            .create_room(host.clone(), Timestamp::new(0))
            .await
            .unwrap();
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_unregister_client()
            .times(1)
            .return_const(());
        pusher.expect_broadcast().never();
        let usecase = DisconnectClientUseCase::new(repository.clone(), Arc::new(pusher));

        // when (操作):
        let departures = usecase.execute(&host).await;

        // then (期待する結果):
        assert_eq!(departures.len(), 1);
        assert!(departures[0].room_deleted);
        assert!(repository.get_room(&room_code).await.is_none());
    }

    #[tokio::test]
    async fn test_disconnect_without_rooms() {
        // テスト項目: どのルームにも属さない接続の切断は登録解除のみ
        // given (前提条件):
        let repository = Arc::new(InMemoryRoomRepository::new());
        let mut pusher = MockMessagePusher::new();
        pusher
            .expect_unregister_client()
            .times(1)
            .return_const(());
        pusher.expect_broadcast().never();
        let usecase = DisconnectClientUseCase::new(repository, Arc::new(pusher));

        // when (操作):
        let departures = usecase
            .execute(&ConnectionId::new("lonely".to_string()).unwrap())
            .await;

        // then (期待する結果):
        assert!(departures.is_empty());
    }
}
