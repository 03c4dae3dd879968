//! Panel view surface driven by the controller.

use parking_lot::Mutex;
use serde::Serialize;

use pagechat_store::types::{ConversationTurn, Role};

use crate::render::{escape_html, RenderedMessage};
use crate::types::ContentStatus;

/// How a turn enters the message list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Presentation {
    /// Restored or user-authored: shown at once.
    Instant,
    /// Fresh assistant reply: revealed by the typewriter.
    Animated,
}

/// Rendering target for the panel UI.
pub trait PanelView: Send + Sync {
    fn show_credential_entry(&self);
    fn show_chat(&self);
    fn set_status(&self, status: &ContentStatus);
    fn append_turn(&self, turn: &ConversationTurn, presentation: Presentation);
    fn clear_messages(&self);
}

/// A message as displayed: assistant text rendered, user text escaped only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayedMessage {
    pub role: Role,
    pub content: String,
    pub html: String,
    pub presentation: Presentation,
}

impl DisplayedMessage {
    pub fn new(turn: &ConversationTurn, presentation: Presentation) -> Self {
        let html = match turn.role {
            Role::Assistant => RenderedMessage::new(&turn.content).html,
            Role::User => escape_html(&turn.content).replace('\n', "<br>"),
        };
        Self {
            role: turn.role,
            content: turn.content.clone(),
            html,
            presentation,
        }
    }
}

/// Everything the controller asked the view to do, in order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ViewEvent {
    CredentialEntry,
    Chat,
    Status(ContentStatus),
    Message(DisplayedMessage),
    Cleared,
}

/// View that records events and keeps the current screen contents.
#[derive(Default)]
pub struct RecordingView {
    events: Mutex<Vec<ViewEvent>>,
    messages: Mutex<Vec<DisplayedMessage>>,
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().clone()
    }

    /// Messages currently on screen.
    pub fn messages(&self) -> Vec<DisplayedMessage> {
        self.messages.lock().clone()
    }

    pub fn status(&self) -> Option<ContentStatus> {
        self.events.lock().iter().rev().find_map(|e| match e {
            ViewEvent::Status(status) => Some(status.clone()),
            _ => None,
        })
    }

    fn record(&self, event: ViewEvent) {
        self.events.lock().push(event);
    }
}

impl PanelView for RecordingView {
    fn show_credential_entry(&self) {
        self.record(ViewEvent::CredentialEntry);
    }

    fn show_chat(&self) {
        self.record(ViewEvent::Chat);
    }

    fn set_status(&self, status: &ContentStatus) {
        self.record(ViewEvent::Status(status.clone()));
    }

    fn append_turn(&self, turn: &ConversationTurn, presentation: Presentation) {
        let message = DisplayedMessage::new(turn, presentation);
        self.messages.lock().push(message.clone());
        self.record(ViewEvent::Message(message));
    }

    fn clear_messages(&self) {
        self.messages.lock().clear();
        self.record(ViewEvent::Cleared);
    }
}
