//! Native credential host.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};

use pagechat_browser::handle_native_message;
use pagechat_browser::native::NativeResponse;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/native", post(native_message))
}

async fn native_message(
    State(state): State<Arc<AppState>>,
    Json(raw): Json<serde_json::Value>,
) -> Json<NativeResponse> {
    Json(handle_native_message(&state.vault, raw))
}
