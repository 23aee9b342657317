//! In-memory `ConnectionRegistry` implementation.
//!
//! ## 責務
//!
//! - 接続中のクライアントの `OutboundChannel` を管理
//! - 全クライアントへのメッセージ送信（broadcast）
//!
//! ## 設計ノート
//!
//! Every operation takes the same `tokio::sync::Mutex`, so registration,
//! deregistration and fanout never interleave. A broadcast iterates and prunes
//! the map inside one critical section: each member receives the message exactly
//! once and failed members are removed before anyone else can observe them.
//!
//! Pushing into an unbounded channel never awaits, so holding the lock across
//! the whole fanout does not block on slow sockets; the per-connection writer
//! task drains the channel.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{
    BroadcastReport, ConnectionId, ConnectionRegistry, OutboundChannel, RegistryError,
};

/// In-memory registry of live connections
pub struct InMemoryConnectionRegistry {
    /// Key: connection id, Value: outbound queue of that connection
    connections: Mutex<HashMap<ConnectionId, OutboundChannel>>,
    /// Maximum number of simultaneous connections (`None` = unbounded)
    max_connections: Option<usize>,
}

impl InMemoryConnectionRegistry {
    /// Create a registry without a connection limit
    pub fn new() -> Self {
        Self::with_max_connections(None)
    }

    /// Create a registry that rejects registrations beyond `max_connections`
    pub fn with_max_connections(max_connections: Option<usize>) -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
            max_connections,
        }
    }
}

impl Default for InMemoryConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConnectionRegistry for InMemoryConnectionRegistry {
    async fn register(
        &self,
        connection_id: ConnectionId,
        channel: OutboundChannel,
    ) -> Result<(), RegistryError> {
        let mut connections = self.connections.lock().await;

        if connections.contains_key(&connection_id) {
            tracing::debug!("Connection '{}' is already registered", connection_id);
            return Ok(());
        }

        if let Some(max) = self.max_connections
            && connections.len() >= max
        {
            return Err(RegistryError::CapacityExceeded(max));
        }

        connections.insert(connection_id, channel);
        tracing::debug!(
            "Connection '{}' registered ({} live)",
            connection_id,
            connections.len()
        );
        Ok(())
    }

    async fn unregister(&self, connection_id: &ConnectionId) -> bool {
        let mut connections = self.connections.lock().await;

        // Dropping the channel closes the connection's writer
        match connections.remove(connection_id) {
            Some(_channel) => {
                tracing::debug!(
                    "Connection '{}' unregistered ({} live)",
                    connection_id,
                    connections.len()
                );
                true
            }
            None => false,
        }
    }

    async fn broadcast(&self, content: &str) -> BroadcastReport {
        let mut connections = self.connections.lock().await;
        let mut report = BroadcastReport::default();

        for (connection_id, channel) in connections.iter() {
            // ブロードキャストでは一部の送信失敗を許容
            if let Err(e) = channel.send(content.to_string()) {
                tracing::warn!(
                    "Failed to push message to connection '{}': {}",
                    connection_id,
                    e
                );
                report.dropped.push(*connection_id);
            } else {
                tracing::debug!("Broadcasted message to connection '{}'", connection_id);
                report.delivered += 1;
            }
        }

        for connection_id in &report.dropped {
            connections.remove(connection_id);
        }

        report
    }

    async fn count(&self) -> usize {
        self.connections.lock().await.len()
    }

    async fn has_capacity(&self) -> bool {
        match self.max_connections {
            Some(max) => self.connections.lock().await.len() < max,
            None => true,
        }
    }
}
