//! MessagePusher trait 定義
//!
//! 接続への通知送信のインターフェース。具体的な実装（WebSocket）は
//! Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, MessagePushError, Notification};

/// 接続ごとの送信キュー
pub type PusherChannel = mpsc::UnboundedSender<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MessagePusher: Send + Sync {
    /// 接続の送信キューを登録
    async fn register_client(&self, connection_id: ConnectionId, sender: PusherChannel);

    /// 接続の送信キューを登録解除
    async fn unregister_client(&self, connection_id: &ConnectionId);

    /// 1 つの接続に通知を送信
    async fn push_to(
        &self,
        connection_id: &ConnectionId,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;

    /// 複数の接続に通知を送信（一部の失敗は許容）
    async fn broadcast(
        &self,
        targets: Vec<ConnectionId>,
        notification: &Notification,
    ) -> Result<(), MessagePushError>;
}
