//! UseCase: クライアント切断処理

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry};

/// クライアント切断のユースケース
pub struct DisconnectClientUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl DisconnectClientUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Remove a connection from the relay.
    ///
    /// Safe to call for a connection that a failed broadcast already removed;
    /// returns `true` only if this call removed it.
    pub async fn execute(&self, connection_id: ConnectionId) -> bool {
        let removed = self.registry.unregister(&connection_id).await;
        if removed {
            tracing::info!(
                "Connection '{}' disconnected and removed from registry",
                connection_id
            );
        } else {
            tracing::debug!(
                "Connection '{}' was already removed from registry",
                connection_id
            );
        }
        removed
    }
}
