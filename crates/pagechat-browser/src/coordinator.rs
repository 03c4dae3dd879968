//! Content coordinator — per-tab record cache, navigation invalidation,
//! message brokering between panels and page scripts.

use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{debug, info};

use pagechat_extract::PageContentRecord;

use crate::protocol::{IncomingMessage, MessageResponse};
use crate::types::*;

/// Something that can put the chat panel in front of the user.
pub trait PanelSurface: Send + Sync {
    fn surface(&self, window_id: WindowId);
}

struct CachedRecord {
    generation: u64,
    record: PageContentRecord,
}

#[derive(Default)]
struct TabEntry {
    window_id: Option<WindowId>,
    url: Option<String>,
    generation: u64,
    cached: Option<CachedRecord>,
}

impl TabEntry {
    /// Drop the cached record and start a new page generation.
    fn invalidate(&mut self) {
        self.cached = None;
        self.generation += 1;
    }

    fn current_record(&self) -> Option<&PageContentRecord> {
        self.cached
            .as_ref()
            .filter(|c| c.generation == self.generation)
            .map(|c| &c.record)
    }
}

#[derive(Default)]
struct CoordinatorState {
    tabs: HashMap<TabId, TabEntry>,
    active: HashMap<WindowId, TabId>,
    focused_window: Option<WindowId>,
    open_panels: BTreeSet<WindowId>,
}

/// Long-lived owner of the tab → content cache.
///
/// Every handler runs its whole mutation under one write lock, so eviction
/// and repopulation for a tab are never interleaved with a `fetch`.
pub struct ContentCoordinator {
    state: RwLock<CoordinatorState>,
    surface: Option<Arc<dyn PanelSurface>>,
}

impl ContentCoordinator {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CoordinatorState::default()),
            surface: None,
        }
    }

    /// Create a coordinator that surfaces panels through `surface`.
    pub fn with_surface(surface: Arc<dyn PanelSurface>) -> Self {
        Self {
            state: RwLock::new(CoordinatorState::default()),
            surface: Some(surface),
        }
    }

    // ---------------------------------------------------------------
    // Cache
    // ---------------------------------------------------------------

    /// Store `record` for `tab_id`, replacing any previous entry.
    pub fn submit(&self, tab_id: TabId, record: PageContentRecord) {
        let mut state = self.state.write();
        let entry = state.tabs.entry(tab_id).or_default();
        if entry.url.is_none() && !record.url.is_empty() {
            entry.url = Some(record.url.clone());
        }
        entry.cached = Some(CachedRecord {
            generation: entry.generation,
            record,
        });
        debug!("Stored page content for tab {} (generation {})", tab_id, entry.generation);
    }

    /// Store `record` only if it was extracted under the tab's current
    /// generation. Returns whether it was stored.
    pub fn submit_if_current(&self, tab_id: TabId, generation: u64, record: PageContentRecord) -> bool {
        let mut state = self.state.write();
        let entry = state.tabs.entry(tab_id).or_default();
        if entry.generation != generation {
            debug!(
                "Dropped stale record for tab {} (generation {} != {})",
                tab_id, generation, entry.generation
            );
            return false;
        }
        entry.cached = Some(CachedRecord { generation, record });
        true
    }

    /// Cached record for `tab_id`, if its page has not navigated since.
    pub fn fetch(&self, tab_id: TabId) -> Option<PageContentRecord> {
        self.state
            .read()
            .tabs
            .get(&tab_id)
            .and_then(|t| t.current_record())
            .cloned()
    }

    /// Current page generation of `tab_id` (0 for unknown tabs).
    pub fn generation(&self, tab_id: TabId) -> u64 {
        self.state
            .read()
            .tabs
            .get(&tab_id)
            .map(|t| t.generation)
            .unwrap_or(0)
    }

    // ---------------------------------------------------------------
    // Tab events
    // ---------------------------------------------------------------

    /// Tab-update event. A `loading` or `complete` status evicts the tab's
    /// record before anything can be submitted for the new page.
    pub fn on_tab_updated(&self, tab_id: TabId, change: TabChange) {
        let mut state = self.state.write();
        let entry = state.tabs.entry(tab_id).or_default();

        if let Some(url) = change.url {
            entry.url = Some(url);
        }
        if let Some(window_id) = change.window_id {
            entry.window_id = Some(window_id);
        }
        if let Some(status) = change.status {
            entry.invalidate();
            debug!(
                "Cleared cache for tab {} on {} (generation {})",
                tab_id, status, entry.generation
            );
        }

        let window_id = entry.window_id;
        if change.active == Some(true) {
            if let Some(window_id) = window_id {
                state.active.insert(window_id, tab_id);
                state.focused_window = Some(window_id);
            }
        }
    }

    /// Tab became the active tab of `window_id`.
    pub fn on_tab_activated(&self, tab_id: TabId, window_id: WindowId) {
        let mut state = self.state.write();
        state.tabs.entry(tab_id).or_default().window_id = Some(window_id);
        state.active.insert(window_id, tab_id);
        state.focused_window = Some(window_id);
    }

    /// Tab closed: forget it and its record.
    pub fn on_tab_removed(&self, tab_id: TabId) {
        let mut state = self.state.write();
        state.tabs.remove(&tab_id);
        state.active.retain(|_, active| *active != tab_id);
        debug!("Removed tab {}", tab_id);
    }

    /// Active tab of `window_id`, or of the last focused window.
    pub fn active_tab(&self, window_id: Option<WindowId>) -> Option<TabInfo> {
        let state = self.state.read();
        let window_id = window_id.or(state.focused_window)?;
        let tab_id = *state.active.get(&window_id)?;
        state.tabs.get(&tab_id).map(|entry| TabInfo {
            id: tab_id,
            window_id: entry.window_id,
            url: entry.url.clone(),
            generation: entry.generation,
            has_content: entry.current_record().is_some(),
        })
    }

    // ---------------------------------------------------------------
    // Panels
    // ---------------------------------------------------------------

    /// Surface the panel for `window_id`. Opening an open panel is a no-op.
    pub fn open_panel(&self, window_id: WindowId) {
        let newly_opened = self.state.write().open_panels.insert(window_id);
        if newly_opened {
            info!("Opening panel for window {}", window_id);
            if let Some(surface) = &self.surface {
                surface.surface(window_id);
            }
        }
    }

    pub fn is_panel_open(&self, window_id: WindowId) -> bool {
        self.state.read().open_panels.contains(&window_id)
    }

    // ---------------------------------------------------------------
    // Messaging
    // ---------------------------------------------------------------

    /// Dispatch a protocol message addressed to the background context.
    pub fn handle_message(&self, sender: MessageSender, message: IncomingMessage) -> MessageResponse {
        debug!("Background received {} from {:?}", message.action(), sender);
        match message {
            IncomingMessage::PageContentExtracted { data } => match sender.tab_id {
                Some(tab_id) => {
                    if let Some(window_id) = sender.window_id {
                        let mut state = self.state.write();
                        state.tabs.entry(tab_id).or_default().window_id = Some(window_id);
                    }
                    self.submit(tab_id, data);
                    MessageResponse::ack()
                }
                None => MessageResponse::failure("Content push without a sender tab"),
            },
            IncomingMessage::GetPageContent => match self.active_tab(sender.window_id) {
                Some(tab) => MessageResponse::with_content(self.fetch(tab.id)),
                None => MessageResponse::failure("No active tab"),
            },
            IncomingMessage::ExtractPageContent => {
                MessageResponse::failure("extractPageContent is handled by page scripts")
            }
            IncomingMessage::OpenSidebar => {
                let window_id = sender.window_id.or(self.state.read().focused_window);
                match window_id {
                    Some(window_id) => {
                        self.open_panel(window_id);
                        MessageResponse::ack()
                    }
                    None => MessageResponse::failure("No window to open the panel in"),
                }
            }
        }
    }

    // ---------------------------------------------------------------
    // Status
    // ---------------------------------------------------------------

    pub fn status(&self) -> CoordinatorStatus {
        let state = self.state.read();
        CoordinatorStatus {
            tabs_tracked: state.tabs.len(),
            cached_records: state
                .tabs
                .values()
                .filter(|t| t.current_record().is_some())
                .count(),
            open_panels: state.open_panels.iter().copied().collect(),
            focused_window: state.focused_window,
        }
    }
}

impl Default for ContentCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn record(url: &str, content: &str) -> PageContentRecord {
        PageContentRecord {
            title: "T".into(),
            url: url.into(),
            description: String::new(),
            content: content.into(),
            extracted_at: "2025-07-30T00:00:00+00:00".into(),
        }
    }

    fn navigate(coordinator: &ContentCoordinator, tab: TabId, status: TabStatus) {
        coordinator.on_tab_updated(
            tab,
            TabChange {
                status: Some(status),
                ..Default::default()
            },
        );
    }

    #[test]
    fn test_submit_then_fetch() {
        let coordinator = ContentCoordinator::new();
        assert!(coordinator.fetch(1).is_none());
        coordinator.submit(1, record("https://a.test", "a"));
        assert_eq!(coordinator.fetch(1).unwrap().content, "a");
    }

    #[test]
    fn test_navigation_evicts_then_resubmit() {
        let coordinator = ContentCoordinator::new();
        coordinator.submit(7, record("https://old.test", "old"));

        navigate(&coordinator, 7, TabStatus::Complete);
        assert!(coordinator.fetch(7).is_none());

        let fresh = record("https://new.test", "new");
        coordinator.submit(7, fresh.clone());
        assert_eq!(coordinator.fetch(7), Some(fresh));
    }

    #[test]
    fn test_last_write_wins() {
        let coordinator = ContentCoordinator::new();
        coordinator.submit(2, record("https://a.test", "first"));
        coordinator.submit(2, record("https://a.test", "second"));
        assert_eq!(coordinator.fetch(2).unwrap().content, "second");
    }

    #[test]
    fn test_tab_removed_evicts() {
        let coordinator = ContentCoordinator::new();
        coordinator.on_tab_activated(3, 1);
        coordinator.submit(3, record("https://a.test", "a"));
        coordinator.on_tab_removed(3);
        assert!(coordinator.fetch(3).is_none());
        assert!(coordinator.active_tab(Some(1)).is_none());
    }

    #[test]
    fn test_stale_generation_rejected() {
        let coordinator = ContentCoordinator::new();
        let before = coordinator.generation(4);
        navigate(&coordinator, 4, TabStatus::Loading);

        assert!(!coordinator.submit_if_current(4, before, record("https://old.test", "old")));
        assert!(coordinator.fetch(4).is_none());

        let now = coordinator.generation(4);
        assert!(coordinator.submit_if_current(4, now, record("https://new.test", "new")));
        assert_eq!(coordinator.fetch(4).unwrap().content, "new");
    }

    #[test]
    fn test_url_only_update_keeps_record() {
        let coordinator = ContentCoordinator::new();
        coordinator.submit(5, record("https://a.test", "a"));
        coordinator.on_tab_updated(
            5,
            TabChange {
                url: Some("https://a.test/#section".into()),
                ..Default::default()
            },
        );
        assert!(coordinator.fetch(5).is_some());
    }

    #[test]
    fn test_get_page_content_for_active_tab() {
        let coordinator = ContentCoordinator::new();
        coordinator.on_tab_activated(10, 1);
        coordinator.on_tab_activated(20, 2);

        coordinator.handle_message(
            MessageSender::page(10, 1),
            IncomingMessage::PageContentExtracted {
                data: record("https://one.test", "one"),
            },
        );

        let response =
            coordinator.handle_message(MessageSender::panel(1), IncomingMessage::GetPageContent);
        assert!(response.success);
        assert_eq!(response.content.unwrap().content, "one");

        let response =
            coordinator.handle_message(MessageSender::panel(2), IncomingMessage::GetPageContent);
        assert!(response.success);
        assert!(response.content.is_none());

        let response =
            coordinator.handle_message(MessageSender::panel(99), IncomingMessage::GetPageContent);
        assert!(!response.success);
    }

    #[test]
    fn test_push_without_tab_rejected() {
        let coordinator = ContentCoordinator::new();
        let response = coordinator.handle_message(
            MessageSender::default(),
            IncomingMessage::PageContentExtracted {
                data: record("https://a.test", "a"),
            },
        );
        assert!(!response.success);
        assert_eq!(coordinator.status().tabs_tracked, 0);
    }

    struct CountingSurface(Mutex<Vec<WindowId>>);

    impl PanelSurface for CountingSurface {
        fn surface(&self, window_id: WindowId) {
            self.0.lock().push(window_id);
        }
    }

    #[test]
    fn test_open_panel_idempotent() {
        let surface = Arc::new(CountingSurface(Mutex::new(Vec::new())));
        let coordinator = ContentCoordinator::with_surface(surface.clone());

        coordinator.open_panel(1);
        coordinator.open_panel(1);
        let response = coordinator.handle_message(MessageSender::panel(1), IncomingMessage::OpenSidebar);
        assert!(response.success);

        assert_eq!(*surface.0.lock(), vec![1]);
        assert!(coordinator.is_panel_open(1));
        assert_eq!(coordinator.status().open_panels, vec![1]);
    }
}
