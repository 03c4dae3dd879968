//! Content source for a hosted panel: reaches the active page through the
//! coordinator, the tab's page script, or by injecting the extractor into the
//! tab's document.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use pagechat_browser::{
    ContentCoordinator, IncomingMessage, MessageResponse, MessageSender, TabInfo, WindowId,
};
use pagechat_core::{Error, Result};
use pagechat_extract::{try_extract, PageContentRecord};
use pagechat_runtime::ContentSource;

use crate::state::TabDocuments;

pub struct HostContentSource {
    coordinator: Arc<ContentCoordinator>,
    documents: TabDocuments,
    window_id: WindowId,
}

impl HostContentSource {
    pub fn new(coordinator: Arc<ContentCoordinator>, documents: TabDocuments, window_id: WindowId) -> Self {
        Self {
            coordinator,
            documents,
            window_id,
        }
    }
}

#[async_trait]
impl ContentSource for HostContentSource {
    async fn active_tab(&self) -> Option<TabInfo> {
        self.coordinator.active_tab(Some(self.window_id))
    }

    async fn cached(&self, _tab: &TabInfo) -> Result<MessageResponse> {
        Ok(self
            .coordinator
            .handle_message(MessageSender::panel(self.window_id), IncomingMessage::GetPageContent))
    }

    async fn request_extraction(&self, tab: &TabInfo) -> Result<MessageResponse> {
        let script = self
            .documents
            .read()
            .get(&tab.id)
            .filter(|doc| doc.script_attached)
            .map(|doc| doc.script.clone())
            .ok_or_else(|| Error::NotFound(format!("No page script in tab {}", tab.id)))?;

        let response = script.handle_message(&IncomingMessage::ExtractPageContent);
        if let Some(record) = response.content.clone() {
            if self.coordinator.submit_if_current(tab.id, tab.generation, record) {
                debug!("Cached fresh extraction for tab {}", tab.id);
            }
        }
        Ok(response)
    }

    async fn inject_extraction(&self, tab: &TabInfo) -> Result<PageContentRecord> {
        let script = self
            .documents
            .read()
            .get(&tab.id)
            .map(|doc| doc.script.clone())
            .ok_or_else(|| Error::NotFound(format!("No document in tab {}", tab.id)))?;
        try_extract(script.html(), script.url())
    }
}
