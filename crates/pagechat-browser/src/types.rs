//! Tab and window types shared by the coordinator and its callers.

use serde::{Deserialize, Serialize};

/// Browser tab identifier.
pub type TabId = i64;

/// Browser window identifier.
pub type WindowId = i64;

/// Load status reported by a tab-update event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TabStatus {
    Loading,
    Complete,
}

impl std::fmt::Display for TabStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Loading => write!(f, "loading"),
            Self::Complete => write!(f, "complete"),
        }
    }
}

/// Fields changed by a tab-update event. Absent fields are unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TabChange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<TabStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "windowId")]
    pub window_id: Option<WindowId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Snapshot of what the coordinator knows about a tab.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TabInfo {
    pub id: TabId,
    #[serde(skip_serializing_if = "Option::is_none", rename = "windowId")]
    pub window_id: Option<WindowId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Bumped on every navigation of this tab.
    pub generation: u64,
    #[serde(rename = "hasContent")]
    pub has_content: bool,
}

/// Origin of a cross-context message.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSender {
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "tabId")]
    pub tab_id: Option<TabId>,
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "windowId")]
    pub window_id: Option<WindowId>,
}

impl MessageSender {
    /// A page script running in `tab` of `window`.
    pub fn page(tab_id: TabId, window_id: WindowId) -> Self {
        Self {
            tab_id: Some(tab_id),
            window_id: Some(window_id),
        }
    }

    /// An extension page (panel, menu) attached to `window`.
    pub fn panel(window_id: WindowId) -> Self {
        Self {
            tab_id: None,
            window_id: Some(window_id),
        }
    }
}

/// Coordinator status summary.
#[derive(Debug, Clone, Serialize)]
pub struct CoordinatorStatus {
    #[serde(rename = "tabsTracked")]
    pub tabs_tracked: usize,
    #[serde(rename = "cachedRecords")]
    pub cached_records: usize,
    #[serde(rename = "openPanels")]
    pub open_panels: Vec<WindowId>,
    #[serde(skip_serializing_if = "Option::is_none", rename = "focusedWindow")]
    pub focused_window: Option<WindowId>,
}
