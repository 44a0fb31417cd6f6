//! WebSocket connection handlers.

use std::sync::Arc;

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{
        ConnectionId, ErrorKind, PlaybackPosition, RoomCode, ValueObjectError, VideoFileInfo,
    },
    infrastructure::dto::websocket::ClientMessage,
    ui::state::AppState,
    usecase::JoinRoomError,
};

/// Why a client request was refused; sent back to the sender only.
type Rejection = (ErrorKind, String);

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// Every notification for this connection goes through the channel, so frames
/// are written in the order the use cases produced them.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let connection_id = state.connect_client_usecase.execute(tx).await;
    tracing::info!("Client '{}' connected", connection_id);

    let (sender, mut receiver) = socket.split();

    let recv_state = state.clone();
    let recv_connection_id = connection_id.clone();

    // Spawn a task to receive requests from this client
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", recv_connection_id, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received from '{}': {}", recv_connection_id, text);
                    handle_text(&recv_state, &recv_connection_id, text.as_str()).await;
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", recv_connection_id);
                    break;
                }
                // Binary is not part of the protocol; ping/pong is answered by axum
                _ => {}
            }
        }
    });

    // Spawn a task to write queued notifications to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    let departures = state
        .disconnect_client_usecase
        .execute(&connection_id)
        .await;
    tracing::info!(
        "Client '{}' disconnected (left {} room(s))",
        connection_id,
        departures.len()
    );
}

async fn handle_text(state: &AppState, connection_id: &ConnectionId, text: &str) {
    let result = match serde_json::from_str::<ClientMessage>(text) {
        Ok(message) => dispatch(state, connection_id, message).await,
        Err(e) => Err((ErrorKind::InvalidPayload, format!("malformed message: {e}"))),
    };

    if let Err((kind, message)) = result {
        state
            .notify_error_usecase
            .execute(connection_id, kind, message)
            .await;
    }
}

/// Route one parsed request to its use case.
async fn dispatch(
    state: &AppState,
    connection_id: &ConnectionId,
    message: ClientMessage,
) -> Result<(), Rejection> {
    match message {
        ClientMessage::CreateRoom => {
            state
                .create_room_usecase
                .execute(connection_id)
                .await
                .map_err(|e| (e.kind(), e.to_string()))?;
        }
        ClientMessage::JoinRoom { room_code } => {
            let room_code = join_target(room_code)?;
            state
                .join_room_usecase
                .execute(connection_id, &room_code)
                .await
                .map_err(|e| (e.kind(), e.to_string()))?;
        }
        ClientMessage::HostVideoInfo {
            room_code,
            name,
            size,
        } => {
            let room_code = invalid_payload(RoomCode::new(room_code))?;
            let video = invalid_payload(VideoFileInfo::new(name, size))?;
            state
                .relay_message_usecase
                .relay_video_info(connection_id, &room_code, video)
                .await
                .map_err(|e| (e.kind(), e.to_string()))?;
        }
        ClientMessage::VideoAction {
            room_code,
            action,
            time,
            is_playing,
        } => {
            let room_code = invalid_payload(RoomCode::new(room_code))?;
            let position = invalid_payload(PlaybackPosition::new(time))?;
            state
                .relay_message_usecase
                .relay_video_action(connection_id, &room_code, action.into(), position, is_playing)
                .await
                .map_err(|e| (e.kind(), e.to_string()))?;
        }
    }
    Ok(())
}

fn invalid_payload<T>(result: Result<T, ValueObjectError>) -> Result<T, Rejection> {
    result.map_err(|e| (ErrorKind::InvalidPayload, e.to_string()))
}

/// A join code that is not even well-formed cannot name a live room.
fn join_target(room_code: String) -> Result<RoomCode, Rejection> {
    RoomCode::new(room_code.clone()).map_err(|_| {
        let error = JoinRoomError::RoomNotFound(room_code.trim().to_string());
        (error.kind(), error.to_string())
    })
}
