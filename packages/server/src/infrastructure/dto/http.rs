//! HTTP API response DTOs.

use serde::Serialize;

/// Response body of `GET /api/health`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthDto {
    pub status: String,
    /// Number of currently registered connections
    pub connections: usize,
}

impl HealthDto {
    pub fn ok(connections: usize) -> Self {
        Self {
            status: "ok".to_string(),
            connections,
        }
    }
}
