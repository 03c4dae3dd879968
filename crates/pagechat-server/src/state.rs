//! Shared application state.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tokio::sync::mpsc;

use pagechat_browser::{BrowserConfig, ContentCoordinator, FileVault, PageScript, TabId, WindowId};
use pagechat_chat::{ChatModel, HttpChatModel, ModelConfig};
use pagechat_core::{PageChatConfig, PanelCapabilities};

use crate::panels::{PanelLauncher, PanelSession};

/// The document loaded in a tab, as last reported by the page.
#[derive(Debug, Clone)]
pub struct TabDocument {
    pub script: PageScript,
    /// False when the page loaded before a page script could attach; the
    /// document is then only reachable by injection.
    pub script_attached: bool,
}

/// Tab → current document.
pub type TabDocuments = Arc<RwLock<HashMap<TabId, TabDocument>>>;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: PageChatConfig,
    pub model_config: ModelConfig,
    pub browser_config: BrowserConfig,
    pub capabilities: PanelCapabilities,
    pub coordinator: Arc<ContentCoordinator>,
    pub documents: TabDocuments,
    pub vault: FileVault,
    pub model: Arc<dyn ChatModel>,
    panels: RwLock<HashMap<WindowId, Arc<PanelSession>>>,
    panel_rx: Mutex<Option<mpsc::UnboundedReceiver<WindowId>>>,
}

impl AppState {
    pub fn new(config: PageChatConfig) -> Self {
        let model_config = ModelConfig::load(&config.data_paths.model_config_file);
        let model = Arc::new(HttpChatModel::new(model_config.clone()));
        Self::with_model(config, model_config, model)
    }

    /// State whose panels talk to `model` instead of the configured endpoint.
    pub fn with_model(
        config: PageChatConfig,
        model_config: ModelConfig,
        model: Arc<dyn ChatModel>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();

        let browser_config = BrowserConfig::load(&config.data_paths.browser_config_file);
        let coordinator = Arc::new(ContentCoordinator::with_surface(Arc::new(
            PanelLauncher::new(tx),
        )));
        let vault = FileVault::new(&config.data_paths.credentials_file);

        Self {
            config,
            model_config,
            browser_config,
            capabilities: PanelCapabilities::full(),
            coordinator,
            documents: Arc::new(RwLock::new(HashMap::new())),
            vault,
            model,
            panels: RwLock::new(HashMap::new()),
            panel_rx: Mutex::new(Some(rx)),
        }
    }

    pub fn with_capabilities(mut self, capabilities: PanelCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    /// Take the panel-open receiver (can only be called once, by the worker).
    pub fn take_panel_rx(&self) -> Option<mpsc::UnboundedReceiver<WindowId>> {
        self.panel_rx.lock().take()
    }

    /// Page script of `tab_id`, if one is attached.
    pub fn page_script(&self, tab_id: TabId) -> Option<PageScript> {
        self.documents
            .read()
            .get(&tab_id)
            .filter(|doc| doc.script_attached)
            .map(|doc| doc.script.clone())
    }

    /// Panel session for `window_id`, created and started on first use.
    pub async fn panel(&self, window_id: WindowId) -> Arc<PanelSession> {
        let session = self
            .panels
            .write()
            .entry(window_id)
            .or_insert_with(|| Arc::new(PanelSession::new(self, window_id)))
            .clone();
        session.ensure_started().await;
        session
    }

    pub fn panel_count(&self) -> usize {
        self.panels.read().len()
    }
}
