//! Host status.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/status", get(get_status))
}

async fn get_status(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "coordinator": state.coordinator.status(),
        "documents": state.documents.read().len(),
        "panels": state.panel_count(),
        "capabilities": state.capabilities,
        "model": {
            "endpoint": state.model_config.endpoint,
            "model": state.model_config.model,
            "maxTokens": state.model_config.max_tokens,
            "temperature": state.model_config.temperature,
        },
    }))
}
