//! UseCase: クライアント接続処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - ConnectClientUseCase::execute() / has_capacity()
//!
//! ### どのような状況を想定しているか
//! - 正常系：新規接続の登録
//! - 異常系：接続数の上限超過

use std::sync::Arc;

use crate::domain::{ConnectionId, ConnectionRegistry, OutboundChannel};

use super::error::ConnectError;

/// クライアント接続のユースケース
pub struct ConnectClientUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl ConnectClientUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Register a freshly upgraded connection so it receives broadcast traffic
    ///
    /// # Arguments
    ///
    /// * `connection_id` - Identifier of the new connection
    /// * `channel` - Outbound queue drained by the connection's writer
    ///
    /// # Errors
    ///
    /// Returns `ConnectError::CapacityExceeded` when the relay is full.
    pub async fn execute(
        &self,
        connection_id: ConnectionId,
        channel: OutboundChannel,
    ) -> Result<(), ConnectError> {
        self.registry.register(connection_id, channel).await?;
        tracing::info!("Connection '{}' registered", connection_id);
        Ok(())
    }

    /// Whether a new upgrade should be accepted at all
    pub async fn has_capacity(&self) -> bool {
        self.registry.has_capacity().await
    }
}
