//! UseCase: 接続受付処理
//!
//! 新しい WebSocket 接続に ConnectionId を割り当て、送信キューを登録する。
//! ルームへの参加はこの時点では行わない。

use std::sync::Arc;

use crate::domain::{ConnectionId, MessagePusher, PusherChannel};

/// 接続受付のユースケース
pub struct ConnectClientUseCase {
    /// MessagePusher（メッセージ通知の抽象化）
    message_pusher: Arc<dyn MessagePusher>,
}

impl ConnectClientUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    /// 接続を受け付け、割り当てた ID を返す
    pub async fn execute(&self, sender: PusherChannel) -> ConnectionId {
        let connection_id = ConnectionId::generate();
        self.message_pusher
            .register_client(connection_id.clone(), sender)
            .await;
        connection_id
    }
}
