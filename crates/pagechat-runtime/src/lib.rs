//! Conversation controller — drives the panel's chat loop.
//!
//! Owns the conversation history, detects the user's language on every
//! turn, handles slash commands, runs the page-content fallback chain and
//! issues one cancellable model request at a time.

pub mod acquisition;
pub mod commands;
pub mod controller;
pub mod language;
pub mod prompts;
pub mod render;
pub mod strings;
pub mod types;
pub mod view;

pub use acquisition::{acquire_content, ContentSource};
pub use commands::Command;
pub use controller::ConversationController;
pub use language::{detect_language, Language};
pub use render::{render_markup, typewriter, RenderedMessage, TypingFrame, TYPING_INTERVAL};
pub use types::*;
pub use view::{DisplayedMessage, PanelView, Presentation, RecordingView, ViewEvent};
