//! Client execution logic with reconnection support.

use std::time::Duration;

use syncwatch_shared::time::SystemClock;
use tokio::sync::mpsc;

use crate::{
    controller::WatchController,
    domain::{next_attempt, should_attempt_reconnect, should_exit_immediately},
    error::ClientError,
    session::run_client_session,
    ui::spawn_input_thread,
};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the interactive client, reconnecting when the connection drops.
///
/// Room membership, the loaded file and playback survive reconnects; the last
/// room is re-joined on every new connection.
pub async fn run_client(url: String) -> Result<(), ClientError> {
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    spawn_input_thread(input_tx);

    let mut controller = WatchController::new(SystemClock);
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} (attempt {}/{})",
            url,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, &mut controller, &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                break;
            }
            Err(e) => {
                if should_exit_immediately(&e) {
                    tracing::error!("{}", e);
                    return Err(e);
                }

                tracing::warn!("Connection lost: {}", e);
                reconnect_count = next_attempt(&e, reconnect_count);

                if !should_attempt_reconnect(&e, reconnect_count, MAX_RECONNECT_ATTEMPTS) {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    return Err(e);
                }

                tracing::info!(
                    "Reconnecting in {} seconds... (attempt {}/{})",
                    RECONNECT_INTERVAL_SECS,
                    reconnect_count + 1,
                    MAX_RECONNECT_ATTEMPTS
                );

                tokio::time::sleep(Duration::from_secs(RECONNECT_INTERVAL_SECS)).await;
            }
        }
    }

    Ok(())
}
