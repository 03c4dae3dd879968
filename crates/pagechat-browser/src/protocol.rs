//! Cross-context message protocol (page script ↔ background ↔ panel).
//!
//! A closed set of actions; anything else is rejected with an explicit
//! error response instead of being echoed back.

use serde::{Deserialize, Serialize};

use pagechat_extract::PageContentRecord;

/// Actions understood by the coordinator and page scripts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum IncomingMessage {
    /// Page → background push after a page load. Fire-and-forget.
    PageContentExtracted { data: PageContentRecord },
    /// Panel → background pull of the active tab's cached record.
    GetPageContent,
    /// Panel → page script request for a fresh extraction.
    ExtractPageContent,
    /// Panel/menu → background request to surface the panel.
    OpenSidebar,
}

impl IncomingMessage {
    pub const ACTIONS: &'static [&'static str] = &[
        "pageContentExtracted",
        "getPageContent",
        "extractPageContent",
        "openSidebar",
    ];

    pub fn action(&self) -> &'static str {
        match self {
            Self::PageContentExtracted { .. } => "pageContentExtracted",
            Self::GetPageContent => "getPageContent",
            Self::ExtractPageContent => "extractPageContent",
            Self::OpenSidebar => "openSidebar",
        }
    }
}

/// Response to any protocol message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<PageContentRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl MessageResponse {
    pub fn ack() -> Self {
        Self {
            success: true,
            content: None,
            error: None,
        }
    }

    pub fn with_content(content: Option<PageContentRecord>) -> Self {
        Self {
            success: true,
            content,
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: None,
            error: Some(error.into()),
        }
    }

    /// The carried record, if the call succeeded and it has any text.
    pub fn usable_content(self) -> Option<PageContentRecord> {
        if !self.success {
            return None;
        }
        self.content.filter(|c| c.is_usable())
    }
}

/// Decode a raw JSON message, rejecting unknown or malformed actions.
pub fn parse_message(raw: serde_json::Value) -> Result<IncomingMessage, MessageResponse> {
    let action = match raw.get("action").and_then(|a| a.as_str()) {
        Some(action) => action.to_string(),
        None => return Err(MessageResponse::failure("Missing action")),
    };

    if !IncomingMessage::ACTIONS.contains(&action.as_str()) {
        return Err(MessageResponse::failure(format!(
            "Unrecognized action: {}",
            action
        )));
    }

    serde_json::from_value(raw)
        .map_err(|e| MessageResponse::failure(format!("Malformed {} message: {}", action, e)))
}
