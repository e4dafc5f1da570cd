use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use super::{handlers, triage};
use crate::state::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Form page
        .route("/", get(triage::form_page).post(triage::run_form))
        // Health and config
        .route("/health", get(handlers::health))
        .route("/config", get(handlers::get_config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
