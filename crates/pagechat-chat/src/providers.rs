//! Model endpoint client.
//!
//! One OpenAI-compatible `chat/completions` call per user turn, raced against
//! the caller's cancellation token. Dropping the request future aborts the
//! underlying HTTP exchange.

use async_trait::async_trait;
use reqwest::Client;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use pagechat_core::Credential;

use crate::config::ModelConfig;
use crate::types::{completion_text, ChatError, ChatMessage, CompletionRequest};

/// A language model that answers a whole conversation in one response.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        credential: &Credential,
        messages: Vec<ChatMessage>,
        cancel: &CancellationToken,
    ) -> Result<String, ChatError>;
}

/// `reqwest` client for an OpenAI-compatible endpoint.
pub struct HttpChatModel {
    client: Client,
    config: ModelConfig,
}

impl HttpChatModel {
    pub fn new(config: ModelConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    pub fn with_client(client: Client, config: ModelConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    async fn request(
        &self,
        credential: &Credential,
        messages: Vec<ChatMessage>,
    ) -> Result<String, ChatError> {
        let body = CompletionRequest {
            model: self.config.model.clone(),
            messages,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!(
            "Requesting completion from {} with model {} ({} messages)",
            self.config.endpoint,
            body.model,
            body.messages.len()
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("Authorization", format!("Bearer {}", credential.expose()))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            debug!("Endpoint error body: {}", detail);
            return Err(ChatError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("").to_string(),
            });
        }

        let value: serde_json::Value = response
            .json()
            .await
            .map_err(|_| ChatError::MalformedResponse)?;
        completion_text(&value)
    }
}

#[async_trait]
impl ChatModel for HttpChatModel {
    async fn complete(
        &self,
        credential: &Credential,
        messages: Vec<ChatMessage>,
        cancel: &CancellationToken,
    ) -> Result<String, ChatError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(ChatError::Cancelled),
            result = self.request(credential, messages) => result,
        }
    }
}
