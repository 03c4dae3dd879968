//! Chat-completions wire types and errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Chat message sent to the model endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: usize,
    pub temperature: f64,
}

/// Failure modes of a completion call.
#[derive(Error, Debug)]
pub enum ChatError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("API request failed: {status} {reason}")]
    Status { status: u16, reason: String },

    #[error("Invalid API response format")]
    MalformedResponse,

    #[error("Request cancelled")]
    Cancelled,
}

impl ChatError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}

/// Pull `choices[0].message.content` out of a completion response.
pub fn completion_text(body: &serde_json::Value) -> Result<String, ChatError> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .map(|s| s.to_string())
        .ok_or(ChatError::MalformedResponse)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_completion_text() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": "Hi!"}}]});
        assert_eq!(completion_text(&body).unwrap(), "Hi!");
    }

    #[test]
    fn test_missing_path_is_malformed() {
        for body in [
            json!({}),
            json!({"choices": []}),
            json!({"choices": [{"delta": {"content": "x"}}]}),
            json!({"choices": [{"message": {"content": null}}]}),
        ] {
            let err = completion_text(&body).unwrap_err();
            assert_eq!(err.to_string(), "Invalid API response format");
        }
    }

    #[test]
    fn test_request_body_shape() {
        let request = CompletionRequest {
            model: "deepseek-chat".into(),
            messages: vec![ChatMessage::system("s"), ChatMessage::new("user", "u")],
            max_tokens: 2000,
            temperature: 0.7,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["max_tokens"], 2000);
        assert_eq!(value["temperature"], 0.7);
        assert_eq!(value["messages"][0]["role"], "system");
    }
}
