//! UseCase: 中継サーバーの状態取得

use std::sync::Arc;

use crate::domain::ConnectionRegistry;

/// Snapshot of the relay for health checks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayStatus {
    pub connections: usize,
}

/// 状態取得のユースケース
pub struct GetStatusUseCase {
    registry: Arc<dyn ConnectionRegistry>,
}

impl GetStatusUseCase {
    pub fn new(registry: Arc<dyn ConnectionRegistry>) -> Self {
        Self { registry }
    }

    pub async fn execute(&self) -> RelayStatus {
        RelayStatus {
            connections: self.registry.count().await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MockConnectionRegistry;

    #[tokio::test]
    async fn test_status_reports_connection_count() {
        // テスト項目: 接続数がそのまま返される
        // given (前提条件):
        let mut registry = MockConnectionRegistry::new();
        registry.expect_count().times(1).returning(|| 3);
        let usecase = GetStatusUseCase::new(Arc::new(registry));

        // when (操作):
        let status = usecase.execute().await;

        // then (期待する結果):
        assert_eq!(status, RelayStatus { connections: 3 });
    }
}
