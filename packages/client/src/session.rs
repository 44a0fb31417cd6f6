//! WebSocket client session.
//!
//! One task owns the controller and multiplexes server frames, user input and
//! the settle timer, so the engine never sees two inputs at once.

use std::pin::Pin;

use futures_util::{SinkExt, StreamExt, stream::SplitSink};
use syncwatch_server::infrastructure::dto::websocket::ServerMessage;
use syncwatch_shared::time::Clock;
use tokio::{net::TcpStream, sync::mpsc, time::Sleep};
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async,
    tungstenite::{self, protocol::Message},
};

use crate::{
    command::Command,
    controller::{Reaction, WatchController},
    error::ClientError,
    formatter::MessageFormatter,
    sync::SettleTicket,
    ui::print_output,
};

type WsSink = SplitSink<WebSocketStream<MaybeTlsStream<TcpStream>>, Message>;

/// Pending settle transition, re-armed by every applied remote event
type SettleTimer = Option<(SettleTicket, Pin<Box<Sleep>>)>;

/// Run one connection until it breaks or the user quits.
///
/// Returns `Ok(())` when the user ends input (Ctrl+C / Ctrl+D).
pub async fn run_client_session<C: Clock + Clone>(
    url: &str,
    controller: &mut WatchController<C>,
    input_rx: &mut mpsc::UnboundedReceiver<String>,
) -> Result<(), ClientError> {
    let (ws_stream, _) = connect_async(url).await.map_err(|e| match e {
        tungstenite::Error::Url(_) => ClientError::InvalidUrl(url.to_string()),
        other => ClientError::ConnectionError(other.to_string()),
    })?;

    tracing::info!("Connected to {}", url);
    print_output(&[MessageFormatter::format_notice(
        "Connected. Type 'help' for commands, Ctrl+D to exit.",
    )]);

    let (mut write, mut read) = ws_stream.split();
    let mut settle_timer: SettleTimer = None;

    let reaction = controller.on_connected();
    carry_out(reaction, &mut write, &mut settle_timer).await?;

    loop {
        tokio::select! {
            frame = read.next() => {
                let reaction = match frame {
                    Some(Ok(Message::Text(text))) => {
                        match serde_json::from_str::<ServerMessage>(text.as_str()) {
                            Ok(message) => controller.on_server_message(message),
                            Err(e) => {
                                tracing::warn!("Ignoring unreadable frame: {} ({})", text.as_str(), e);
                                continue;
                            }
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!("Server closed the connection");
                        return Err(ClientError::ConnectionLost);
                    }
                    Some(Err(e)) => {
                        tracing::warn!("WebSocket read error: {}", e);
                        return Err(ClientError::ConnectionLost);
                    }
                    Some(Ok(_)) => continue,
                };
                carry_out(reaction, &mut write, &mut settle_timer).await?;
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    write.send(Message::Close(None)).await.ok();
                    return Ok(());
                };
                let result = Command::parse(&line).and_then(|command| controller.on_command(command));
                match result {
                    Ok(reaction) => carry_out(reaction, &mut write, &mut settle_timer).await?,
                    Err(e) => print_output(&[MessageFormatter::format_notice(&e.to_string())]),
                }
            }
            ticket = wait_settle(&mut settle_timer) => {
                settle_timer = None;
                controller.on_settle(ticket);
            }
        }
    }
}

/// Resolves when the armed settle timer fires; never resolves when disarmed.
async fn wait_settle(timer: &mut SettleTimer) -> SettleTicket {
    match timer {
        Some((ticket, sleep)) => {
            sleep.as_mut().await;
            *ticket
        }
        None => std::future::pending().await,
    }
}

async fn carry_out(
    reaction: Reaction,
    write: &mut WsSink,
    settle_timer: &mut SettleTimer,
) -> Result<(), ClientError> {
    if let Some((ticket, delay)) = reaction.settle {
        *settle_timer = Some((ticket, Box::pin(tokio::time::sleep(delay))));
    }

    print_output(&reaction.output);

    for message in reaction.outgoing {
        let json = match serde_json::to_string(&message) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize message: {}", e);
                continue;
            }
        };
        tracing::debug!("Sending {}", json);
        if let Err(e) = write.send(Message::Text(json.into())).await {
            tracing::warn!("Failed to send message: {}", e);
            return Err(ClientError::ConnectionLost);
        }
    }
    Ok(())
}
