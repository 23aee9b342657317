//! HTTP API endpoint handlers.

use std::sync::Arc;

use axum::{Json, extract::State};

use crate::{infrastructure::dto::http::HealthDto, ui::state::AppState};

/// Health check endpoint
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthDto> {
    let status = state.get_status_usecase.execute().await;
    Json(HealthDto::ok(status.connections))
}
