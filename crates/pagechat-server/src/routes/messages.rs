//! Cross-context protocol endpoint.
//!
//! `extractPageContent` addressed to a tab goes to that tab's page script;
//! everything else is handled by the coordinator.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use tracing::warn;

use pagechat_browser::{parse_message, IncomingMessage, MessageResponse, MessageSender, TabId, WindowId};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/messages", post(post_message))
}

#[derive(Debug, Deserialize)]
struct SenderQuery {
    tab: Option<TabId>,
    window: Option<WindowId>,
}

async fn post_message(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SenderQuery>,
    Json(raw): Json<serde_json::Value>,
) -> Json<MessageResponse> {
    let message = match parse_message(raw) {
        Ok(message) => message,
        Err(rejection) => {
            warn!("Rejected message: {:?}", rejection.error);
            return Json(rejection);
        }
    };

    let sender = MessageSender {
        tab_id: query.tab,
        window_id: query.window,
    };

    let response = match (&message, sender.tab_id) {
        (IncomingMessage::ExtractPageContent, Some(tab_id)) => match state.page_script(tab_id) {
            Some(script) => script.handle_message(&message),
            None => MessageResponse::failure(format!("No page script in tab {}", tab_id)),
        },
        _ => state.coordinator.handle_message(sender, message),
    };
    Json(response)
}
