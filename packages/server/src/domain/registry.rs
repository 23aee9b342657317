//! ConnectionRegistry trait 定義
//!
//! The registry is the only state shared between connection handlers. Handlers
//! register their outbound channel after the upgrade handshake, broadcast every
//! inbound message through it, and unregister when their loop ends.

use async_trait::async_trait;
use tokio::sync::mpsc;

use super::{ConnectionId, RegistryError};

/// Outbound queue of one connection.
///
/// Each queued string is one serialized text frame. Dropping the last sender
/// ends the connection's writer, which closes the socket.
pub type OutboundChannel = mpsc::UnboundedSender<String>;

/// Outcome of one fanout
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Number of connections the message was queued for
    pub delivered: usize,
    /// Connections whose outbound channel was closed; they are no longer registered
    pub dropped: Vec<ConnectionId>,
}

/// Registry of live connections.
///
/// Implementations must make `register`, `unregister` and `broadcast` mutually
/// exclusive: a broadcast sees a consistent membership snapshot and no
/// connection is delivered to twice or skipped because of a concurrent change.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ConnectionRegistry: Send + Sync {
    /// Add a connection. Registering an id that is already present is a no-op.
    async fn register(
        &self,
        connection_id: ConnectionId,
        channel: OutboundChannel,
    ) -> Result<(), RegistryError>;

    /// Remove a connection and release its outbound channel.
    ///
    /// Returns `true` only for the call that actually removed it.
    async fn unregister(&self, connection_id: &ConnectionId) -> bool;

    /// Queue `content` for every registered connection, dropping the ones that fail.
    async fn broadcast(&self, content: &str) -> BroadcastReport;

    /// Number of registered connections
    async fn count(&self) -> usize;

    /// Whether one more connection may be registered
    async fn has_capacity(&self) -> bool;
}
