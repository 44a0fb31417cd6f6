//! WebSocket を使った MessagePusher 実装
//!
//! ## 責務
//!
//! - 接続ごとの送信キュー（`UnboundedSender`）を管理
//! - `Notification` を JSON（`ServerMessage`）に変換して送信（push_to, broadcast）
//!
//! ## 設計ノート
//!
//! WebSocket の生成は UI 層（`ui/handler/websocket.rs`）で行われます。
//! この実装は生成された送信キューを受け取り、メッセージ送信に使用します。
//! キューの先で実際にソケットへ書き込むのは UI 層の writer タスクです。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{ConnectionId, MessagePushError, MessagePusher, Notification, PusherChannel};
use crate::infrastructure::dto::websocket::ServerMessage;

/// WebSocket を使った MessagePusher 実装
pub struct WebSocketMessagePusher {
    /// 接続中のクライアントの送信キュー
    clients: Mutex<HashMap<ConnectionId, PusherChannel>>,
}

impl WebSocketMessagePusher {
    pub fn new() -> Self {
        Self {
            clients: Mutex::new(HashMap::new()),
        }
    }

    fn encode(notification: &Notification) -> Result<String, MessagePushError> {
        serde_json::to_string(&ServerMessage::from(notification))
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))
    }
}

impl Default for WebSocketMessagePusher {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MessagePusher for WebSocketMessagePusher {
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel) {
        let mut clients = self.clients.lock().await;
        tracing::debug!("Client '{}' registered to MessagePusher", connection_id);
        clients.insert(connection_id, sender);
    }

    async fn unregister_client(&self, connection_id: &ConnectionId) {
        let mut clients = self.clients.lock().await;
        clients.remove(connection_id);
        tracing::debug!("Client '{}' unregistered from MessagePusher", connection_id);
    }

    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        let content = Self::encode(notification)?;
        let clients = self.clients.lock().await;

        let sender = clients
            .get(connection_id)
            .ok_or_else(|| MessagePushError::ClientNotFound(connection_id.as_str().to_string()))?;
        sender
            .send(content)
            .map_err(|e| MessagePushError::PushFailed(e.to_string()))?;
        tracing::debug!("Pushed message to client '{}'", connection_id);
        Ok(())
    }

    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        notification: &Notification,
    ) -> Result<(), MessagePushError> {
        if targets.is_empty() {
            return Ok(());
        }
        let content = Self::encode(notification)?;
        let clients = self.clients.lock().await;

        for target in targets {
            if let Some(sender) = clients.get(&target) {
                // ブロードキャストでは一部の送信失敗を許容
                if let Err(e) = sender.send(content.clone()) {
                    tracing::warn!("Failed to push message to client '{}': {}", target, e);
                } else {
                    tracing::debug!("Broadcasted message to client '{}'", target);
                }
            } else {
                tracing::warn!("Client '{}' not found during broadcast, skipping", target);
            }
        }

        Ok(())
    }
}
