//! Page content acquisition — the ordered fallback chain the panel runs each
//! time it becomes ready.
//!
//! 1. restricted or missing tab → degraded sentinel
//! 2. the coordinator's cache (`getPageContent`)
//! 3. the page script (`extractPageContent`)
//! 4. direct injection of the extractor into the tab
//! 5. give up

use async_trait::async_trait;
use tracing::debug;

use pagechat_browser::{BrowserConfig, MessageResponse, TabInfo};
use pagechat_core::Result;
use pagechat_extract::PageContentRecord;

use crate::types::{Acquisition, ContentOrigin};

/// The three ways a panel can reach the active page.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Active tab of the panel's window.
    async fn active_tab(&self) -> Option<TabInfo>;
    /// Ask the coordinator for its cached record.
    async fn cached(&self, tab: &TabInfo) -> Result<MessageResponse>;
    /// Ask the tab's page script to extract now.
    async fn request_extraction(&self, tab: &TabInfo) -> Result<MessageResponse>;
    /// Run the extractor inside the tab without a page script.
    async fn inject_extraction(&self, tab: &TabInfo) -> Result<PageContentRecord>;
}

fn accept(step: &str, response: Result<MessageResponse>) -> Option<PageContentRecord> {
    match response {
        Ok(response) => {
            let content = response.usable_content();
            if content.is_none() {
                debug!("{}: no usable content", step);
            }
            content
        }
        Err(e) => {
            debug!("{} failed: {}", step, e);
            None
        }
    }
}

/// Run the fallback chain once.
pub async fn acquire_content(source: &dyn ContentSource, config: &BrowserConfig) -> Acquisition {
    let Some(tab) = source.active_tab().await else {
        debug!("No active tab; content restricted");
        return Acquisition::Restricted;
    };
    match tab.url.as_deref() {
        Some(url) if !config.is_restricted(url) => {}
        other => {
            debug!("Tab {} is restricted ({:?})", tab.id, other);
            return Acquisition::Restricted;
        }
    }

    if let Some(record) = accept("Cache lookup", source.cached(&tab).await) {
        debug!("Tab {} content served from cache", tab.id);
        return Acquisition::Loaded(record, ContentOrigin::Cache);
    }

    if let Some(record) = accept("Page script", source.request_extraction(&tab).await) {
        debug!("Tab {} content extracted by page script", tab.id);
        return Acquisition::Loaded(record, ContentOrigin::PageScript);
    }

    match source.inject_extraction(&tab).await {
        Ok(record) if record.is_usable() => {
            debug!("Tab {} content extracted by injection", tab.id);
            return Acquisition::Loaded(record, ContentOrigin::Injection);
        }
        Ok(_) => debug!("Injection: no usable content"),
        Err(e) => debug!("Injection failed: {}", e),
    }

    Acquisition::Failed
}
