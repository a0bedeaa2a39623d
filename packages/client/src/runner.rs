//! Client execution logic with reconnection support.

use std::time::Duration;

use crate::{domain::should_exit_immediately, error::ClientError, session::run_client_session};

const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const RECONNECT_INTERVAL_SECS: u64 = 5;

/// Run the WebSocket client with reconnection logic
pub async fn run_client(
    url: String,
    room: String,
    name: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut reconnect_count = 0;

    loop {
        tracing::info!(
            "Attempting to connect to {} (room '{}') as '{}' (attempt {}/{})",
            url,
            room,
            name,
            reconnect_count + 1,
            MAX_RECONNECT_ATTEMPTS
        );

        match run_client_session(&url, &room, &name).await {
            Ok(_) => {
                tracing::info!("Client session ended normally");
                // If connection ended normally (user exit), don't reconnect
                break;
            }
            Err(e) => {
                // A refused join is never retried
                if let Some(client_err) = e.downcast_ref::<ClientError>()
                    && should_exit_immediately(client_err)
                {
                    tracing::error!("{}", e);
                    tracing::error!(
                        "Server refused the join for room '{}'. Exiting.",
                        room
                    );
                    std::process::exit(1);
                }

                tracing::warn!("Connection lost: {}", e);
                reconnect_count += 1;

                if reconnect_count >= MAX_RECONNECT_ATTEMPTS {
                    tracing::error!(
                        "Failed to reconnect after {} attempts. Exiting.",
                        MAX_RECONNECT_ATTEMPTS
                    );
                    std::process::exit(1);
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
