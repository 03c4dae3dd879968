//! Data types for persisted panel state.

use serde::{Deserialize, Serialize};

use pagechat_core::Credential;

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One message in the panel conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    /// RFC 3339 creation time.
    pub timestamp: String,
}

impl ConversationTurn {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Ordered conversation, oldest first.
pub type ConversationHistory = Vec<ConversationTurn>;

/// Everything a panel restores on startup.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(
        default,
        rename = "deepseekApiKey",
        skip_serializing_if = "Option::is_none",
        deserialize_with = "pagechat_core::credential::deserialize_optional"
    )]
    pub credential: Option<Credential>,
    #[serde(default, rename = "conversationHistory", skip_serializing_if = "Option::is_none")]
    pub history: Option<ConversationHistory>,
}
