//! Hosted panel sessions — one conversation controller per browser window.

use std::sync::Arc;

use tokio::sync::{mpsc, OnceCell};
use tracing::{error, info, warn};

use pagechat_browser::{PanelSurface, WindowId};
use pagechat_runtime::{ConversationController, RecordingView};
use pagechat_store::JsonSessionStore;

use crate::bridge::HostContentSource;
use crate::state::AppState;

/// A window's panel: its controller and what it currently shows.
pub struct PanelSession {
    pub window_id: WindowId,
    pub controller: Arc<ConversationController>,
    pub view: Arc<RecordingView>,
    started: OnceCell<()>,
}

impl PanelSession {
    pub fn new(state: &AppState, window_id: WindowId) -> Self {
        let session_file = state
            .config
            .data_paths
            .panel_session_file(&window_id.to_string());
        let store = Arc::new(JsonSessionStore::new(&session_file));
        let source = Arc::new(HostContentSource::new(
            state.coordinator.clone(),
            state.documents.clone(),
            window_id,
        ));
        let view = Arc::new(RecordingView::new());

        let controller = ConversationController::new(
            state.capabilities,
            store,
            state.model.clone(),
            source,
            view.clone(),
        )
        .with_browser_config(state.browser_config.clone())
        .with_history_window(state.model_config.history_window);

        Self {
            window_id,
            controller: Arc::new(controller),
            view,
            started: OnceCell::new(),
        }
    }

    /// Run the controller's startup exactly once.
    pub async fn ensure_started(&self) {
        self.started
            .get_or_init(|| async {
                info!("Starting panel for window {}", self.window_id);
                self.controller.start().await;
            })
            .await;
    }
}

/// Surfaces panels by queueing the window for the panel worker.
pub struct PanelLauncher {
    tx: mpsc::UnboundedSender<WindowId>,
}

impl PanelLauncher {
    pub fn new(tx: mpsc::UnboundedSender<WindowId>) -> Self {
        Self { tx }
    }
}

impl PanelSurface for PanelLauncher {
    fn surface(&self, window_id: WindowId) {
        if self.tx.send(window_id).is_err() {
            warn!("Panel worker gone; window {} not surfaced", window_id);
        }
    }
}

/// Start the background task that brings up panels opened by `openSidebar`.
pub fn start_panel_worker(state: Arc<AppState>) {
    let mut rx = match state.take_panel_rx() {
        Some(rx) => rx,
        None => {
            error!("Panel worker already started");
            return;
        }
    };

    tokio::spawn(async move {
        info!("Panel worker started");
        while let Some(window_id) = rx.recv().await {
            state.panel(window_id).await;
        }
    });
}
