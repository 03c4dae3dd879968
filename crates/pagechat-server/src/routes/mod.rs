//! HTTP route handlers — the browser's extension messaging surface plus the
//! panel UI's actions.

pub mod messages;
pub mod native;
pub mod panel;
pub mod status;
pub mod tabs;

use std::sync::Arc;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the main Axum router with all routes.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest("/api", api_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .merge(status::routes())
        .merge(messages::routes())
        .merge(tabs::routes())
        .merge(native::routes())
        .merge(panel::routes())
}
