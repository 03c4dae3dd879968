//! Tab lifecycle events and page documents.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::routing::{delete, post, put};
use axum::{Json, Router};
use serde::Deserialize;
use tracing::{debug, info};

use pagechat_browser::{IncomingMessage, PageScript, TabChange, TabId, TabStatus, WindowId};

use crate::state::{AppState, TabDocument};

// ---------------------------------------------------------------
// Route builder
// ---------------------------------------------------------------

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tabs/{id}/updated", post(tab_updated))
        .route("/tabs/{id}/activated", post(tab_activated))
        .route("/tabs/{id}", delete(tab_removed))
        .route("/tabs/{id}/document", put(put_document))
}

// ---------------------------------------------------------------
// Body types
// ---------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ActivatedBody {
    #[serde(rename = "windowId")]
    window_id: WindowId,
}

#[derive(Debug, Deserialize)]
struct DocumentBody {
    url: String,
    html: String,
    #[serde(default = "default_true", rename = "scriptAttached")]
    script_attached: bool,
}

fn default_true() -> bool {
    true
}

// ---------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------

async fn tab_updated(
    State(state): State<Arc<AppState>>,
    Path(tab_id): Path<TabId>,
    Json(change): Json<TabChange>,
) -> Json<serde_json::Value> {
    let navigating = change.status == Some(TabStatus::Loading);
    state.coordinator.on_tab_updated(tab_id, change);
    if navigating {
        state.documents.write().remove(&tab_id);
    }

    Json(serde_json::json!({
        "success": true,
        "generation": state.coordinator.generation(tab_id),
    }))
}

async fn tab_activated(
    State(state): State<Arc<AppState>>,
    Path(tab_id): Path<TabId>,
    Json(body): Json<ActivatedBody>,
) -> Json<serde_json::Value> {
    state.coordinator.on_tab_activated(tab_id, body.window_id);
    Json(serde_json::json!({ "success": true }))
}

async fn tab_removed(
    State(state): State<Arc<AppState>>,
    Path(tab_id): Path<TabId>,
) -> Json<serde_json::Value> {
    state.coordinator.on_tab_removed(tab_id);
    state.documents.write().remove(&tab_id);
    Json(serde_json::json!({ "success": true }))
}

/// A page finished loading. With a page script attached, its automatic
/// push reaches the coordinator after the configured delay, unless the tab
/// navigates first.
async fn put_document(
    State(state): State<Arc<AppState>>,
    Path(tab_id): Path<TabId>,
    Json(body): Json<DocumentBody>,
) -> Json<serde_json::Value> {
    let script = PageScript::new(body.url, body.html);
    let generation = state.coordinator.generation(tab_id);
    info!("Document loaded in tab {}: {}", tab_id, script.url());

    state.documents.write().insert(
        tab_id,
        TabDocument {
            script: script.clone(),
            script_attached: body.script_attached,
        },
    );

    if body.script_attached {
        let delay = Duration::from_millis(state.browser_config.auto_push_delay_ms);
        let coordinator = state.coordinator.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let IncomingMessage::PageContentExtracted { data } = script.auto_push() {
                if !coordinator.submit_if_current(tab_id, generation, data) {
                    debug!("Tab {} navigated before its content was pushed", tab_id);
                }
            }
        });
    }

    Json(serde_json::json!({
        "success": true,
        "generation": generation,
    }))
}
