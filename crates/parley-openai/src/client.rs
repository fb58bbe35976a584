//! Thin HTTP client for the OpenAI `/chat/completions` endpoint.
//!
//! One round-trip per call, no retries, no streaming. Timeouts are whatever
//! `reqwest` defaults to — higher layers own recovery policy.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use parley_core::error::HelperError;

use crate::options::EffectiveOptions;

// ─────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────

/// A chat message in the provider format.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

/// Speaker role in a chat conversation.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Request body for the chat-completions endpoint.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    /// Always `false` — streaming is not supported by this helper.
    pub stream: bool,
    #[serde(flatten)]
    pub options: EffectiveOptions,
}

/// Chat-completions response body.
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    pub id: Option<String>,
    pub choices: Vec<ChatChoice>,
}

/// One completion choice.
#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: AssistantMessage,
    pub finish_reason: Option<String>,
}

/// The assistant message within a choice. `content` may be null.
#[derive(Debug, Deserialize)]
pub struct AssistantMessage {
    pub content: Option<String>,
}

// ─────────────────────────────────────────────
// OpenAiClient
// ─────────────────────────────────────────────

/// Immutable client handle: one credential, one base URL, one pooled
/// connection set.
///
/// Credential rotation builds a fresh `OpenAiClient` and swaps the shared
/// `Arc` rather than mutating this one — in-flight calls finish on the old
/// handle.
pub struct OpenAiClient {
    client: Client,
    api_base: String,
    token: String,
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("api_base", &self.api_base)
            .finish()
    }
}

impl OpenAiClient {
    pub fn new(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        OpenAiClient {
            client: Client::new(),
            api_base: api_base.into(),
            token: token.into(),
        }
    }

    /// Build the full chat-completions URL.
    fn completions_url(&self) -> String {
        let base = self.api_base.trim_end_matches('/');
        format!("{}/chat/completions", base)
    }

    /// Send one chat-completion request.
    pub async fn chat_completions(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, HelperError> {
        debug!(
            model = %request.model,
            messages = request.messages.len(),
            "sending chat completion request"
        );

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(status = status.as_u16(), body = %message, "chat completion request failed");
            return Err(HelperError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
