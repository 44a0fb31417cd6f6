//! syncwatch relay server.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin syncwatch-server
//! cargo run --bin syncwatch-server -- --host 127.0.0.1 --port 3001
//! ```

use std::sync::Arc;

use clap::Parser;
use syncwatch_server::{
    infrastructure::{message_pusher::WebSocketMessagePusher, repository::InMemoryRoomRepository},
    ui::{AppState, Server},
};
use syncwatch_shared::{logger::setup_logger, time::SystemClock};

#[derive(Parser, Debug)]
#[command(name = "syncwatch-server")]
#[command(about = "Room registry and playback relay for synchronized local video", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "0.0.0.0", env = "HOST")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value_t = 3001, env = "PORT")]
    port: u16,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    // 1. Repository (in-memory registry)
    let repository = Arc::new(InMemoryRoomRepository::new());

    // 2. MessagePusher (WebSocket implementation)
    let message_pusher = Arc::new(WebSocketMessagePusher::new());

    // 3. UseCases
    let state = AppState::new(repository, message_pusher, Arc::new(SystemClock));

    // 4. Server
    let server = Server::new(state);
    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
