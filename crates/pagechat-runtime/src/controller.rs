//! Conversation controller — the panel's state machine.
//!
//! `AwaitingCredential` → `Ready` ⇄ `AwaitingResponse`. One model request is
//! in flight at a time; it is raced against a cancellation token that is
//! re-checked once the request settles, so a reply arriving after the user
//! pressed stop is dropped.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use pagechat_browser::BrowserConfig;
use pagechat_chat::{ChatError, ChatMessage, ChatModel};
use pagechat_core::{Credential, PanelCapabilities};
use pagechat_store::{ConversationHistory, ConversationTurn, SessionStore};

use crate::acquisition::{acquire_content, ContentSource};
use crate::commands::Command;
use crate::language::{detect_language, Language};
use crate::prompts::system_prompt;
use crate::strings::Strings;
use crate::types::{
    Acquisition, ContentStatus, PageContent, PanelState, SendError, SendOutcome, StatusKind,
};
use crate::view::{PanelView, Presentation};

/// Turns sent to the model besides the system prompt and the new message.
pub const DEFAULT_HISTORY_WINDOW: usize = 20;

struct ControllerState {
    panel: PanelState,
    credential: Option<Credential>,
    history: ConversationHistory,
    page: PageContent,
    language: Language,
    status: ContentStatus,
    in_flight: Option<InFlight>,
}

/// The request currently holding the single in-flight slot.
struct InFlight {
    id: uuid::Uuid,
    token: CancellationToken,
}

/// Drives one panel instance.
pub struct ConversationController {
    capabilities: PanelCapabilities,
    store: Arc<dyn SessionStore>,
    model: Arc<dyn ChatModel>,
    source: Arc<dyn ContentSource>,
    view: Arc<dyn PanelView>,
    browser_config: BrowserConfig,
    history_window: usize,
    state: Mutex<ControllerState>,
}

impl ConversationController {
    pub fn new(
        capabilities: PanelCapabilities,
        store: Arc<dyn SessionStore>,
        model: Arc<dyn ChatModel>,
        source: Arc<dyn ContentSource>,
        view: Arc<dyn PanelView>,
    ) -> Self {
        let language = if capabilities.localization {
            Language::It
        } else {
            Language::En
        };
        Self {
            capabilities,
            store,
            model,
            source,
            view,
            browser_config: BrowserConfig::default(),
            history_window: DEFAULT_HISTORY_WINDOW,
            state: Mutex::new(ControllerState {
                panel: PanelState::AwaitingCredential,
                credential: None,
                history: Vec::new(),
                page: PageContent::Pending,
                language,
                status: ContentStatus::new("", StatusKind::Info),
                in_flight: None,
            }),
        }
    }

    pub fn with_browser_config(mut self, config: BrowserConfig) -> Self {
        self.browser_config = config;
        self
    }

    pub fn with_history_window(mut self, turns: usize) -> Self {
        self.history_window = turns;
        self
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn capabilities(&self) -> PanelCapabilities {
        self.capabilities
    }

    pub fn state(&self) -> PanelState {
        self.state.lock().panel
    }

    pub fn history(&self) -> ConversationHistory {
        self.state.lock().history.clone()
    }

    pub fn page_content(&self) -> PageContent {
        self.state.lock().page.clone()
    }

    pub fn language(&self) -> Language {
        self.state.lock().language
    }

    pub fn status(&self) -> ContentStatus {
        self.state.lock().status.clone()
    }

    pub fn has_credential(&self) -> bool {
        self.state.lock().credential.is_some()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Rehydrate from the session store and show the first screen.
    pub async fn start(&self) {
        let snapshot = self.store.load();
        let has_credential = {
            let mut state = self.state.lock();
            if self.capabilities.persistence {
                state.history = snapshot.history.unwrap_or_default();
                for turn in &state.history {
                    self.view.append_turn(turn, Presentation::Instant);
                }
            }
            state.credential = snapshot.credential;
            state.credential.is_some()
        };

        info!(
            "Panel started (credential={}, {} restored turns)",
            has_credential,
            self.state.lock().history.len()
        );

        if has_credential {
            self.enter_ready().await;
        } else {
            self.view.show_credential_entry();
        }
    }

    /// Store a new API key. Returns false, changing nothing, for blank input
    /// or the display mask.
    pub async fn save_credential(&self, raw: &str) -> bool {
        let Some(credential) = Credential::parse(raw) else {
            debug!("Rejected empty or masked credential");
            return false;
        };
        self.store.save_credential(&credential);
        {
            let mut state = self.state.lock();
            state.credential = Some(credential);
            let strings = Strings::for_language(state.language);
            self.set_status(&mut state, ContentStatus::new(strings.credential_saved, StatusKind::Success));
        }
        info!("Credential saved");
        self.enter_ready().await;
        true
    }

    /// Forget the API key and return to the credential screen.
    pub fn clear_credential(&self) {
        self.store.clear_credential();
        let mut state = self.state.lock();
        if let Some(request) = state.in_flight.take() {
            request.token.cancel();
        }
        state.credential = None;
        state.panel = PanelState::AwaitingCredential;
        self.view.show_credential_entry();
        info!("Credential cleared");
    }

    async fn enter_ready(&self) {
        {
            let mut state = self.state.lock();
            if state.panel == PanelState::AwaitingCredential {
                state.panel = PanelState::Ready;
            }
        }
        self.view.show_chat();
        self.refresh_content().await;
    }

    /// Run the fallback chain and adopt its result.
    pub async fn refresh_content(&self) -> PageContent {
        {
            let mut state = self.state.lock();
            let strings = Strings::for_language(state.language);
            self.set_status(&mut state, ContentStatus::new(strings.extracting, StatusKind::Loading));
        }

        let acquisition = acquire_content(self.source.as_ref(), &self.browser_config).await;

        let mut state = self.state.lock();
        let strings = Strings::for_language(state.language);
        state.page = match acquisition {
            Acquisition::Restricted => PageContent::Restricted,
            Acquisition::Loaded(record, origin) => {
                info!(
                    "Page content loaded from {:?}: {} chars",
                    origin,
                    record.content.chars().count()
                );
                PageContent::Loaded(record)
            }
            Acquisition::Failed => {
                info!("Page content unavailable");
                PageContent::Unavailable
            }
        };
        if state.page == PageContent::Unavailable {
            self.append(
                &mut state,
                ConversationTurn::assistant(strings.reload_hint),
                Presentation::Animated,
            );
        }
        if state.panel != PanelState::AwaitingResponse {
            let status = self.idle_status(&state);
            self.set_status(&mut state, status);
        }
        state.page.clone()
    }

    // ------------------------------------------------------------------
    // Conversation
    // ------------------------------------------------------------------

    /// Handle one message typed by the user.
    pub async fn send(&self, input: &str) -> Result<SendOutcome, SendError> {
        let message = input.trim();
        let request_id = uuid::Uuid::new_v4();
        let (credential, messages, token) = {
            let mut state = self.state.lock();
            match state.panel {
                PanelState::AwaitingCredential => return Err(SendError::NoCredential),
                PanelState::AwaitingResponse => return Err(SendError::Busy),
                PanelState::Ready => {}
            }
            if message.is_empty() {
                return Err(SendError::Empty);
            }
            if let Some((command, alias_language)) = Command::parse(message) {
                if self.capabilities.localization {
                    state.language = alias_language;
                }
                self.run_command(&mut state, command);
                return Ok(SendOutcome::Command(command));
            }
            let Some(credential) = state.credential.clone() else {
                return Err(SendError::NoCredential);
            };

            if self.capabilities.localization {
                state.language = detect_language(message);
            }
            let messages = self.build_request(&state, message);
            self.append(&mut state, ConversationTurn::user(message), Presentation::Instant);

            let token = CancellationToken::new();
            state.in_flight = Some(InFlight {
                id: request_id,
                token: token.clone(),
            });
            state.panel = PanelState::AwaitingResponse;
            let strings = Strings::for_language(state.language);
            self.set_status(&mut state, ContentStatus::new(strings.thinking, StatusKind::Loading));
            (credential, messages, token)
        };

        debug!("Request {}: sending {} messages to the model", request_id, messages.len());
        let result = tokio::select! {
            biased;
            _ = token.cancelled() => Err(ChatError::Cancelled),
            result = self.model.complete(&credential, messages, &token) => result,
        };

        let mut state = self.state.lock();
        // A request cancelled by a credential change may settle after a newer
        // one took the slot; only the owner releases it.
        let owns_slot = state.in_flight.as_ref().is_some_and(|f| f.id == request_id);
        if owns_slot {
            state.in_flight = None;
            if state.panel == PanelState::AwaitingResponse {
                state.panel = if state.credential.is_some() {
                    PanelState::Ready
                } else {
                    PanelState::AwaitingCredential
                };
            }
        }
        let strings = Strings::for_language(state.language);

        let outcome = if token.is_cancelled() {
            info!("Request {}: generation stopped", request_id);
            self.append(&mut state, ConversationTurn::assistant(strings.stopped), Presentation::Instant);
            SendOutcome::Stopped
        } else {
            match result {
                Ok(reply) => {
                    self.append(&mut state, ConversationTurn::assistant(reply), Presentation::Animated);
                    SendOutcome::Replied
                }
                Err(e) => {
                    error!("Request {} failed: {}", request_id, e);
                    self.append(
                        &mut state,
                        ConversationTurn::assistant(strings.request_failed),
                        Presentation::Animated,
                    );
                    SendOutcome::Failed
                }
            }
        };

        if state.in_flight.is_none() {
            let status = self.idle_status(&state);
            self.set_status(&mut state, status);
        }
        Ok(outcome)
    }

    /// Stop the in-flight request. Returns whether there was one to stop.
    pub fn cancel(&self) -> bool {
        if !self.capabilities.cancellation {
            return false;
        }
        match self.state.lock().in_flight.as_ref() {
            Some(request) => {
                request.token.cancel();
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Internals (all called with the state lock held)
    // ------------------------------------------------------------------

    fn build_request(&self, state: &ControllerState, message: &str) -> Vec<ChatMessage> {
        let page = state.page.prompt_text();
        let start = state.history.len().saturating_sub(self.history_window);

        let mut messages = Vec::with_capacity(state.history.len() - start + 2);
        messages.push(ChatMessage::system(system_prompt(state.language, page.as_deref())));
        messages.extend(
            state.history[start..]
                .iter()
                .map(|turn| ChatMessage::new(turn.role.as_str(), turn.content.clone())),
        );
        messages.push(ChatMessage::new("user", message));
        messages
    }

    fn run_command(&self, state: &mut ControllerState, command: Command) {
        debug!("Running command {:?}", command);
        let strings = Strings::for_language(state.language);
        let reply = match command {
            Command::Clear => {
                state.history.clear();
                self.persist(state);
                self.view.clear_messages();
                strings.cleared.to_string()
            }
            Command::Help => strings.help.to_string(),
            Command::Status => {
                let content = match state.page {
                    PageContent::Loaded(_) | PageContent::Restricted => Some(state.page.text()),
                    PageContent::Pending | PageContent::Unavailable => None,
                };
                strings.status_report(state.credential.is_some(), content.as_deref())
            }
        };
        self.append(state, ConversationTurn::assistant(reply), Presentation::Animated);
    }

    fn append(&self, state: &mut ControllerState, turn: ConversationTurn, presentation: Presentation) {
        self.view.append_turn(&turn, presentation);
        state.history.push(turn);
        self.persist(state);
    }

    fn persist(&self, state: &ControllerState) {
        if self.capabilities.persistence {
            self.store.save(&state.history);
        }
    }

    fn idle_status(&self, state: &ControllerState) -> ContentStatus {
        let strings = Strings::for_language(state.language);
        match state.page {
            PageContent::Restricted => ContentStatus::new(strings.ready_limited, StatusKind::Info),
            PageContent::Unavailable => {
                ContentStatus::new(strings.extraction_failed, StatusKind::Error)
            }
            _ => ContentStatus::new(strings.ready, StatusKind::Success),
        }
    }

    fn set_status(&self, state: &mut ControllerState, status: ContentStatus) {
        self.view.set_status(&status);
        state.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use async_trait::async_trait;
    use pagechat_store::{MemorySessionStore, Role, SessionSnapshot};

    use crate::acquisition::tests::{record, FakeSource};
    use crate::types::{RESTRICTED_CONTENT, UNAVAILABLE_CONTENT};
    use crate::view::{RecordingView, ViewEvent};

    /// Model that answers after `delay`, ignoring cancellation.
    struct SlowModel {
        reply: &'static str,
        fail: bool,
        delay: Duration,
        requests: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl SlowModel {
        fn replying(reply: &'static str) -> Self {
            Self {
                reply,
                fail: false,
                delay: Duration::ZERO,
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatModel for SlowModel {
        async fn complete(
            &self,
            _credential: &Credential,
            messages: Vec<ChatMessage>,
            _cancel: &CancellationToken,
        ) -> Result<String, ChatError> {
            self.requests.lock().push(messages);
            tokio::time::sleep(self.delay).await;
            if self.fail {
                Err(ChatError::Status {
                    status: 500,
                    reason: "Internal Server Error".into(),
                })
            } else {
                Ok(self.reply.to_string())
            }
        }
    }

    struct Harness {
        controller: Arc<ConversationController>,
        store: Arc<MemorySessionStore>,
        model: Arc<SlowModel>,
        source: Arc<FakeSource>,
        view: Arc<RecordingView>,
    }

    fn harness(
        capabilities: PanelCapabilities,
        snapshot: SessionSnapshot,
        model: SlowModel,
        source: FakeSource,
    ) -> Harness {
        let store = Arc::new(MemorySessionStore::with_snapshot(snapshot));
        let model = Arc::new(model);
        let source = Arc::new(source);
        let view = Arc::new(RecordingView::new());
        let controller = Arc::new(ConversationController::new(
            capabilities,
            store.clone(),
            model.clone(),
            source.clone(),
            view.clone(),
        ));
        Harness {
            controller,
            store,
            model,
            source,
            view,
        }
    }

    fn with_key() -> SessionSnapshot {
        SessionSnapshot {
            credential: Credential::parse("sk-stored"),
            history: None,
        }
    }

    fn loaded_page() -> FakeSource {
        FakeSource {
            cached: Some(record("Rust is a systems language.")),
            ..FakeSource::at("https://example.com")
        }
    }

    #[tokio::test]
    async fn test_credential_scenario() {
        let h = harness(
            PanelCapabilities::full(),
            SessionSnapshot::default(),
            SlowModel::replying("hi"),
            loaded_page(),
        );
        h.controller.start().await;
        assert_eq!(h.controller.state(), PanelState::AwaitingCredential);
        assert_eq!(h.view.events(), vec![ViewEvent::CredentialEntry]);
        assert_eq!(h.controller.send("hello").await, Err(SendError::NoCredential));

        assert!(!h.controller.save_credential("   ").await);
        assert!(!h.controller.save_credential(pagechat_core::CREDENTIAL_MASK).await);
        assert_eq!(h.controller.state(), PanelState::AwaitingCredential);
        assert!(h.source.calls().is_empty());

        assert!(h.controller.save_credential(" sk-new ").await);
        assert_eq!(h.controller.state(), PanelState::Ready);
        assert_eq!(h.store.load().credential.unwrap().expose(), "sk-new");
        assert_eq!(h.source.calls(), vec!["cached"]);
        assert!(h.controller.page_content().is_loaded());
        assert_eq!(h.controller.status().kind, StatusKind::Success);
    }

    #[tokio::test]
    async fn test_stored_credential_enters_ready_and_restores_history() {
        let snapshot = SessionSnapshot {
            history: Some(vec![
                ConversationTurn::user("earlier"),
                ConversationTurn::assistant("**answer**"),
            ]),
            ..with_key()
        };
        let h = harness(PanelCapabilities::full(), snapshot, SlowModel::replying("x"), loaded_page());
        h.controller.start().await;

        assert_eq!(h.controller.state(), PanelState::Ready);
        let shown = h.view.messages();
        assert_eq!(shown.len(), 2);
        assert!(shown.iter().all(|m| m.presentation == Presentation::Instant));
        assert_eq!(shown[1].html, "<strong>answer</strong>");
    }

    #[tokio::test]
    async fn test_send_appends_and_persists() {
        let h = harness(
            PanelCapabilities::full(),
            with_key(),
            SlowModel::replying("It is about Rust."),
            loaded_page(),
        );
        h.controller.start().await;

        let outcome = h.controller.send("  what is this page about?  ").await;
        assert_eq!(outcome, Ok(SendOutcome::Replied));
        assert_eq!(h.controller.language(), Language::En);

        let history = h.store.load().history.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].role, Role::User);
        assert_eq!(history[0].content, "what is this page about?");
        assert_eq!(history[1].content, "It is about Rust.");

        let requests = h.model.requests.lock();
        let request = &requests[0];
        assert_eq!(request.len(), 2);
        assert_eq!(request[0].role, "system");
        assert!(request[0].content.contains("Rust is a systems language."));
        assert_eq!(request[1].content, "what is this page about?");

        let last = h.view.messages().pop().unwrap();
        assert_eq!(last.presentation, Presentation::Animated);
    }

    #[tokio::test]
    async fn test_history_window_bounds_request() {
        let snapshot = SessionSnapshot {
            history: Some((0..10).map(|i| ConversationTurn::user(format!("q{}", i))).collect()),
            ..with_key()
        };
        let h = harness(PanelCapabilities::full(), snapshot, SlowModel::replying("ok"), loaded_page());
        let controller = Arc::try_unwrap(h.controller)
            .ok()
            .unwrap()
            .with_history_window(3);
        controller.start().await;
        controller.send("che cosa dice").await.unwrap();

        let requests = h.model.requests.lock();
        let contents: Vec<&str> = requests[0].iter().map(|m| m.content.as_str()).collect();
        assert_eq!(&contents[1..], &["q7", "q8", "q9", "che cosa dice"]);
        assert!(contents[0].starts_with("Sei PageChat"));
    }

    #[tokio::test]
    async fn test_clear_command() {
        let snapshot = SessionSnapshot {
            history: Some(vec![ConversationTurn::user("a"), ConversationTurn::assistant("b")]),
            ..with_key()
        };
        let h = harness(PanelCapabilities::full(), snapshot, SlowModel::replying("x"), loaded_page());
        h.controller.start().await;

        let outcome = h.controller.send("/clear").await;
        assert_eq!(outcome, Ok(SendOutcome::Command(Command::Clear)));

        let history = h.store.load().history.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, Role::Assistant);
        assert_eq!(history[0].content, "Chat cleared! 🧹");
        assert!(h.model.requests.lock().is_empty());
        assert_eq!(h.view.messages().len(), 1);
    }

    #[tokio::test]
    async fn test_italian_commands_reply_in_italian() {
        let h = harness(PanelCapabilities::full(), with_key(), SlowModel::replying("x"), loaded_page());
        h.controller.start().await;

        h.controller.send("/STATO").await.unwrap();
        let history = h.controller.history();
        assert_eq!(history.len(), 1);
        assert!(history[0].content.contains("Stato attuale"));
        assert!(history[0].content.contains("✅ Collegata"));
    }

    #[tokio::test]
    async fn test_restricted_page_limits_status() {
        let h = harness(
            PanelCapabilities::full(),
            with_key(),
            SlowModel::replying("x"),
            FakeSource::at("about:blank"),
        );
        h.controller.start().await;

        assert_eq!(h.controller.page_content(), PageContent::Restricted);
        assert_eq!(h.controller.page_content().text(), RESTRICTED_CONTENT);
        assert_eq!(h.controller.status().text, "Pronto (limitato)");
        assert!(h.controller.history().is_empty());

        h.controller.send("/status").await.unwrap();
        let report = h.controller.history().pop().unwrap().content;
        assert!(report.contains(&format!("({} chars)", RESTRICTED_CONTENT.chars().count())));
        assert!(report.contains("This page cannot be analyzed"));
    }

    #[tokio::test]
    async fn test_failed_acquisition_appends_diagnostic() {
        let h = harness(
            PanelCapabilities::full(),
            with_key(),
            SlowModel::replying("x"),
            FakeSource::at("https://example.com"),
        );
        h.controller.start().await;

        assert_eq!(h.controller.page_content().text(), UNAVAILABLE_CONTENT);
        assert_eq!(h.controller.status().kind, StatusKind::Error);
        let history = h.store.load().history.unwrap();
        assert_eq!(history.len(), 1);
        assert!(history[0].content.starts_with("⚠️"));

        h.controller.send("summarize this page please").await.unwrap();
        let requests = h.model.requests.lock();
        assert!(requests[0][0].content.contains("not available"));
    }

    #[tokio::test]
    async fn test_model_failure_shows_generic_error() {
        let model = SlowModel {
            fail: true,
            ..SlowModel::replying("")
        };
        let h = harness(PanelCapabilities::full(), with_key(), model, loaded_page());
        h.controller.start().await;

        let outcome = h.controller.send("what is the weather today").await;
        assert_eq!(outcome, Ok(SendOutcome::Failed));
        assert_eq!(h.controller.state(), PanelState::Ready);
        let history = h.controller.history();
        assert!(history[1].content.starts_with("Sorry"));
        assert!(!history[1].content.contains("500"));
    }

    #[tokio::test]
    async fn test_cancel_discards_late_reply() {
        let model = SlowModel {
            delay: Duration::from_millis(300),
            ..SlowModel::replying("late reply")
        };
        let h = harness(PanelCapabilities::full(), with_key(), model, loaded_page());
        h.controller.start().await;

        let controller = h.controller.clone();
        let pending = tokio::spawn(async move { controller.send("what is the weather today").await });

        tokio::time::sleep(Duration::from_millis(30)).await;
        assert_eq!(h.controller.state(), PanelState::AwaitingResponse);
        assert_eq!(h.controller.send("another").await, Err(SendError::Busy));
        assert!(h.controller.cancel());

        let outcome = pending.await.unwrap();
        assert_eq!(outcome, Ok(SendOutcome::Stopped));
        assert_eq!(h.controller.state(), PanelState::Ready);

        tokio::time::sleep(Duration::from_millis(350)).await;
        let history = h.store.load().history.unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "what is the weather today");
        assert_eq!(history[1].content, "⏹️ Generation stopped.");
        assert!(!history.iter().any(|t| t.content == "late reply"));
        assert!(!h.controller.cancel());
    }

    #[tokio::test]
    async fn test_stale_request_keeps_off_newer_slot() {
        let model = SlowModel {
            delay: Duration::from_millis(300),
            ..SlowModel::replying("reply")
        };
        let h = harness(PanelCapabilities::full(), with_key(), model, loaded_page());
        h.controller.start().await;

        let first = h.controller.send("first question");
        tokio::pin!(first);
        assert!(futures::poll!(first.as_mut()).is_pending());

        h.controller.clear_credential();
        assert!(h.controller.save_credential("sk-other").await);
        assert_eq!(h.controller.state(), PanelState::Ready);

        let second = h.controller.send("second question");
        tokio::pin!(second);
        assert!(futures::poll!(second.as_mut()).is_pending());

        assert_eq!(first.await, Ok(SendOutcome::Stopped));
        assert_eq!(h.controller.state(), PanelState::AwaitingResponse);
        assert_eq!(h.controller.status().kind, StatusKind::Loading);
        assert_eq!(h.controller.send("third question").await, Err(SendError::Busy));

        assert!(h.controller.cancel());
        assert_eq!(second.await, Ok(SendOutcome::Stopped));
        assert_eq!(h.controller.state(), PanelState::Ready);
        assert!(!h.controller.cancel());
    }

    #[tokio::test]
    async fn test_blank_stored_key_awaits_credential() {
        let snapshot: SessionSnapshot =
            serde_json::from_str(r#"{"deepseekApiKey": "", "conversationHistory": []}"#).unwrap();
        let h = harness(PanelCapabilities::full(), snapshot, SlowModel::replying("x"), loaded_page());
        h.controller.start().await;

        assert_eq!(h.controller.state(), PanelState::AwaitingCredential);
        assert!(!h.controller.has_credential());
        assert!(h.source.calls().is_empty());
    }

    #[tokio::test]
    async fn test_minimal_capabilities() {
        let snapshot = SessionSnapshot {
            history: Some(vec![ConversationTurn::user("old")]),
            ..with_key()
        };
        let h = harness(
            PanelCapabilities::minimal(),
            snapshot,
            SlowModel::replying("ok"),
            loaded_page(),
        );
        h.controller.start().await;

        assert!(h.controller.history().is_empty());
        h.controller.send("che cosa dice questa pagina").await.unwrap();
        assert_eq!(h.controller.language(), Language::En);
        assert!(!h.controller.cancel());
        assert_eq!(h.store.load().history.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clear_credential_returns_to_entry() {
        let h = harness(PanelCapabilities::full(), with_key(), SlowModel::replying("x"), loaded_page());
        h.controller.start().await;
        h.controller.clear_credential();

        assert_eq!(h.controller.state(), PanelState::AwaitingCredential);
        assert!(h.store.load().credential.is_none());
        assert_eq!(h.controller.send("hi").await, Err(SendError::NoCredential));
    }
}
