//! Interactive syncwatch client.
//!
//! Connects to a relay, creates or joins a room and keeps a simulated player
//! in sync with the other members. Reconnects on disconnection (max 5
//! attempts with 5 second interval) and re-joins the last room.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin syncwatch-client
//! cargo run --bin syncwatch-client -- --url ws://192.168.0.10:3001/ws
//! ```

use clap::Parser;

use syncwatch_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "syncwatch-client")]
#[command(about = "Watch local video files in sync with other people", long_about = None)]
struct Args {
    /// WebSocket URL of the relay
    #[arg(
        short = 'u',
        long,
        env = "SYNCWATCH_URL",
        default_value = "ws://127.0.0.1:3001/ws"
    )]
    url: String,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "info");

    let args = Args::parse();

    if let Err(e) = syncwatch_client::run_client(args.url).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
