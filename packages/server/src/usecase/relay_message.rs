//! UseCase: メッセージ中継処理
//!
//! ## テスト実装の作業記録
//!
//! ### 何をテストしているか
//! - RelayMessageUseCase::execute() メソッド
//!
//! ### どのような状況を想定しているか
//! - 正常系：送信者を含む全接続へのブロードキャスト
//! - 部分失敗：閉じた接続が削除され、残りの接続には届く

use std::sync::Arc;

use crate::domain::{BroadcastReport, ConnectionId, ConnectionRegistry, Message};

/// メッセージ中継のユースケース
pub struct RelayMessageUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl RelayMessageUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Broadcast one inbound message to every registered connection, sender included.
    ///
    /// # Arguments
    ///
    /// * `from` - Connection the message was read from
    /// * `message` - The decoded message (Domain Model)
    /// * `json_message` - The serialized frame to fan out (built by the DTO layer)
    pub async fn execute(
        &self,
        from: ConnectionId,
        message: &Message,
        json_message: &str,
    ) -> BroadcastReport {
        let report = self.registry.broadcast(json_message).await;

        tracing::info!(
            "Relayed message from '{}' (connection '{}') to {} connection(s)",
            message.sender(),
            from,
            report.delivered
        );
        for dropped in &report.dropped {
            tracing::warn!(
                "Connection '{}' dropped during broadcast after a failed write",
                dropped
            );
        }

        report
    }
}
