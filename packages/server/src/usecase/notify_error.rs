//! UseCase: 送信者へのエラー通知
//!
//! 失敗したリクエストの送信者にだけ `error{kind, message}` を返す。

use std::sync::Arc;

use crate::domain::{ConnectionId, ErrorKind, MessagePusher, Notification};

pub struct NotifyErrorUseCase {
    message_pusher: Arc<dyn MessagePusher>,
}

impl NotifyErrorUseCase {
    pub fn new(message_pusher: Arc<dyn MessagePusher>) -> Self {
        Self { message_pusher }
    }

    pub async fn execute(&self, connection_id: &ConnectionId, kind: ErrorKind, message: String) {
        tracing::warn!("Rejecting request from '{}': {}", connection_id, message);
        if let Err(e) = self
            .message_pusher
            .push_to(connection_id, &Notification::error(kind, message))
            .await
        {
            tracing::warn!("Failed to send error to '{}': {}", connection_id, e);
        }
    }
}
