//! UseCase テスト用のヘルパー
//!
//! 実際の `WebSocketMessagePusher` に送信キューを登録し、積まれた JSON を
//! `ServerMessage` として読み出す。

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{
    domain::{ConnectionId, MessagePusher},
    infrastructure::{
        dto::websocket::ServerMessage, message_pusher::WebSocketMessagePusher,
        repository::InMemoryRoomRepository,
    },
};

pub struct Inbox {
    pub id: ConnectionId,
    rx: mpsc::UnboundedReceiver<String>,
}

impl Inbox {
    /// これまでに届いたメッセージをすべて取り出す
    pub fn drain(&mut self) -> Vec<ServerMessage> {
        let mut messages = Vec::new();
        while let Ok(json) = self.rx.try_recv() {
            messages.push(serde_json::from_str(&json).unwrap());
        }
        messages
    }
}

pub fn setup() -> (Arc<InMemoryRoomRepository>, Arc<WebSocketMessagePusher>) {
    (
        Arc::new(InMemoryRoomRepository::new()),
        Arc::new(WebSocketMessagePusher::new()),
    )
}

pub async fn connect(pusher: &Arc<WebSocketMessagePusher>, name: &str) -> Inbox {
    let id = ConnectionId::new(name.to_string()).unwrap();
    let (tx, rx) = mpsc::unbounded_channel();
    pusher.register_client(id.clone(), tx).await;
    Inbox { id, rx }
}
