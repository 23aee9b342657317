//! Client execution logic with reconnection support.

use std::time::Duration;

use tokio::sync::mpsc;

use super::{error::ClientError, session::run_client_session, ui::spawn_input_reader};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the WebSocket client with reconnection logic
///
/// Terminal input is read once for the whole run, so lines typed while
/// reconnecting are sent on the next session.
pub async fn run_client(url: String, name: String) -> Result<(), ClientError> {
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    let _readline_handle = spawn_input_reader(name.clone(), input_tx);

    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} as '{}' (attempt {}/{})",
            url,
            name,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, &name, &mut input_rx).await {
            Ok(()) => {
                tracing::info!("Client session ended normally");
                // If connection ended normally (user exit), don't reconnect
                break;
            }
            Err(ClientError::Rejected(status)) => {
                tracing::error!(
                    "Server rejected the connection (HTTP {}). Not reconnecting.",
                    status
                );
                return Err(ClientError::Rejected(status));
            }
            Err(e) => {
                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if reconnect_count >= MAX_RECONNECT_ATTEMPTS {
                    return Err(ClientError::ReconnectLimitReached(MAX_RECONNECT_ATTEMPTS));
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
