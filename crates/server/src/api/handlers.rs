//! Service endpoints.

use axum::{extract::State, Json};
use serde::Serialize;
use std::sync::Arc;
use triage_core::SanitizedConfig;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// Liveness probe; never touches FreshService.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// Effective configuration with the API key redacted.
pub async fn get_config(State(state): State<Arc<AppState>>) -> Json<SanitizedConfig> {
    Json(state.sanitized_config())
}
