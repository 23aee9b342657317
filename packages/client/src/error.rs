//! Error types for the relay client.

use thiserror::Error;

/// Client-specific errors
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server refused the upgrade (e.g. 503 when it is full)
    #[error("Server rejected the connection with HTTP {0}")]
    Rejected(u16),

    /// Connection error
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Reconnection attempts exhausted
    #[error("Failed to reconnect after {0} attempts")]
    ReconnectLimitReached(u32),
}
