//! Panel routes — what the side panel UI does: enter the API key, send and
//! stop messages, read the conversation, re-read the page.

use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, Sse};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::Stream;
use serde::Deserialize;
use tokio_stream::StreamExt;

use pagechat_browser::WindowId;
use pagechat_runtime::{typewriter, RenderedMessage, SendError, TYPING_INTERVAL};
use pagechat_store::Role;

use crate::panels::PanelSession;
use crate::state::AppState;

type SseStream = Pin<Box<dyn Stream<Item = Result<Event, Infallible>> + Send>>;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/panel/state", get(get_state))
        .route(
            "/panel/credential",
            post(save_credential).delete(clear_credential),
        )
        .route("/panel/send", post(send))
        .route("/panel/cancel", post(cancel))
        .route("/panel/history", get(get_history))
        .route("/panel/messages/{index}/typing", get(type_message))
        .route("/panel/refresh", post(refresh))
}

// ---------------------------------------------------------------
// Query / Body types
// ---------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct PanelQuery {
    window: Option<WindowId>,
}

#[derive(Debug, Deserialize)]
struct CredentialBody {
    #[serde(rename = "apiKey")]
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct SendBody {
    message: String,
}

fn no_window() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::BAD_REQUEST,
        Json(serde_json::json!({ "error": "No window given and no window focused" })),
    )
}

/// Panel of the requested window, or of the focused one.
async fn resolve_panel(
    state: &AppState,
    query: &PanelQuery,
) -> Result<Arc<PanelSession>, (StatusCode, Json<serde_json::Value>)> {
    let window_id = query
        .window
        .or(state.coordinator.status().focused_window)
        .ok_or_else(no_window)?;
    Ok(state.panel(window_id).await)
}

// ---------------------------------------------------------------
// State
// ---------------------------------------------------------------

async fn get_state(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PanelQuery>,
) -> impl IntoResponse {
    let panel = match resolve_panel(&state, &query).await {
        Ok(panel) => panel,
        Err(e) => return e.into_response(),
    };
    let controller = &panel.controller;
    let page = controller.page_content();

    Json(serde_json::json!({
        "windowId": panel.window_id,
        "state": controller.state(),
        "hasCredential": controller.has_credential(),
        "language": controller.language(),
        "status": controller.status(),
        "capabilities": controller.capabilities(),
        "pageContent": page,
        "contentLength": page.text().chars().count(),
    }))
    .into_response()
}

// ---------------------------------------------------------------
// Credential
// ---------------------------------------------------------------

async fn save_credential(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PanelQuery>,
    Json(body): Json<CredentialBody>,
) -> impl IntoResponse {
    let panel = match resolve_panel(&state, &query).await {
        Ok(panel) => panel,
        Err(e) => return e.into_response(),
    };

    if panel.controller.save_credential(&body.api_key).await {
        Json(serde_json::json!({
            "success": true,
            "state": panel.controller.state(),
        }))
        .into_response()
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({
                "success": false,
                "error": "Please enter a valid API key",
            })),
        )
            .into_response()
    }
}

async fn clear_credential(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PanelQuery>,
) -> impl IntoResponse {
    match resolve_panel(&state, &query).await {
        Ok(panel) => {
            panel.controller.clear_credential();
            Json(serde_json::json!({ "success": true })).into_response()
        }
        Err(e) => e.into_response(),
    }
}

// ---------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------

async fn send(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PanelQuery>,
    Json(body): Json<SendBody>,
) -> impl IntoResponse {
    let panel = match resolve_panel(&state, &query).await {
        Ok(panel) => panel,
        Err(e) => return e.into_response(),
    };

    match panel.controller.send(&body.message).await {
        Ok(outcome) => {
            let reply = panel
                .controller
                .history()
                .into_iter()
                .rev()
                .find(|turn| turn.role == Role::Assistant);
            Json(serde_json::json!({
                "success": true,
                "outcome": outcome.as_str(),
                "reply": reply,
            }))
            .into_response()
        }
        Err(e) => {
            let status = match e {
                SendError::Busy => StatusCode::CONFLICT,
                SendError::NoCredential => StatusCode::UNAUTHORIZED,
                SendError::Empty => StatusCode::BAD_REQUEST,
            };
            (
                status,
                Json(serde_json::json!({
                    "success": false,
                    "error": e.to_string(),
                })),
            )
                .into_response()
        }
    }
}

async fn cancel(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PanelQuery>,
) -> impl IntoResponse {
    match resolve_panel(&state, &query).await {
        Ok(panel) => {
            let cancelled = panel.controller.cancel();
            Json(serde_json::json!({ "cancelled": cancelled })).into_response()
        }
        Err(e) => e.into_response(),
    }
}

async fn get_history(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PanelQuery>,
) -> impl IntoResponse {
    match resolve_panel(&state, &query).await {
        Ok(panel) => Json(serde_json::json!({
            "history": panel.controller.history(),
            "messages": panel.view.messages(),
        }))
        .into_response(),
        Err(e) => e.into_response(),
    }
}

/// Replay one displayed assistant message through the typewriter as SSE.
/// User messages are never animated.
async fn type_message(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Query(query): Query<PanelQuery>,
) -> impl IntoResponse {
    let panel = match resolve_panel(&state, &query).await {
        Ok(panel) => panel,
        Err(e) => return e.into_response(),
    };
    let Some(message) = panel
        .view
        .messages()
        .into_iter()
        .nth(index)
        .filter(|m| m.role == Role::Assistant)
    else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({ "error": format!("No assistant message {}", index) })),
        )
            .into_response();
    };

    let frames = typewriter(RenderedMessage::new(&message.content), TYPING_INTERVAL);
    let stream: SseStream = Box::pin(frames.map(|frame| {
        let data = serde_json::to_string(&frame).unwrap_or_default();
        Ok(Event::default().data(data))
    }));
    Sse::new(stream).into_response()
}

async fn refresh(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PanelQuery>,
) -> impl IntoResponse {
    match resolve_panel(&state, &query).await {
        Ok(panel) => {
            let page = panel.controller.refresh_content().await;
            Json(serde_json::json!({
                "pageContent": page,
                "status": panel.controller.status(),
            }))
            .into_response()
        }
        Err(e) => e.into_response(),
    }
}
