//! Runtime types.

use serde::Serialize;
use thiserror::Error;

use pagechat_extract::PageContentRecord;

use crate::commands::Command;

/// Content sentinel for pages the panel may not read.
pub const RESTRICTED_CONTENT: &str = "This page cannot be analyzed (system page or extension page).";
/// Content sentinel once every acquisition step has failed.
pub const UNAVAILABLE_CONTENT: &str =
    "Unable to extract page content. You can still ask general questions.";

/// Panel lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PanelState {
    AwaitingCredential,
    Ready,
    AwaitingResponse,
}

/// Severity of the status indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusKind {
    Loading,
    Success,
    Error,
    Info,
}

/// The panel's status indicator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentStatus {
    pub text: String,
    pub kind: StatusKind,
}

impl ContentStatus {
    pub fn new(text: impl Into<String>, kind: StatusKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }
}

/// What the controller currently knows about the active page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "record", rename_all = "camelCase")]
pub enum PageContent {
    /// No acquisition has run yet.
    Pending,
    /// Restricted URL or no active tab.
    Restricted,
    /// Every acquisition step failed.
    Unavailable,
    Loaded(PageContentRecord),
}

impl PageContent {
    /// Text the controller holds for the page, sentinels included.
    pub fn text(&self) -> String {
        match self {
            Self::Pending => String::new(),
            Self::Restricted => RESTRICTED_CONTENT.to_string(),
            Self::Unavailable => UNAVAILABLE_CONTENT.to_string(),
            Self::Loaded(record) => record.format_for_prompt(),
        }
    }

    /// Formatted record for the system prompt; `None` unless real content
    /// was acquired.
    pub fn prompt_text(&self) -> Option<String> {
        match self {
            Self::Loaded(record) => Some(record.format_for_prompt()),
            _ => None,
        }
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self, Self::Loaded(_))
    }
}

/// Where the fallback chain found the page content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContentOrigin {
    Cache,
    PageScript,
    Injection,
}

/// Result of one run of the fallback chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Acquisition {
    Restricted,
    Loaded(PageContentRecord, ContentOrigin),
    Failed,
}

/// Why a message was not sent.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    #[error("No API key configured")]
    NoCredential,

    #[error("A response is already in progress")]
    Busy,

    #[error("Message is empty")]
    Empty,
}

/// What a completed `send` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// A slash command was handled locally.
    Command(Command),
    /// The model answered.
    Replied,
    /// The request was cancelled; the stopped notice was appended.
    Stopped,
    /// The request failed; the generic error notice was appended.
    Failed,
}

impl SendOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Command(_) => "command",
            Self::Replied => "replied",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        }
    }
}
