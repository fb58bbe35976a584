//! Shared data model: conversation-history messages and caller-supplied
//! generation options.
//!
//! `HistoryMessage` is the host's view of one stored conversation turn;
//! helpers normalize it into provider roles (sender present ⇒ end user,
//! absent ⇒ the bot itself). `GenerationOptions` is the per-call partial
//! override of the administrator-configured tuning defaults.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ─────────────────────────────────────────────
// Conversation history
// ─────────────────────────────────────────────

/// One prior message from the host's conversation store.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct HistoryMessage {
    /// End-user sender id. Present on inbound messages, absent on bot replies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    /// The message payload.
    pub message: MessageBody,
}

impl HistoryMessage {
    /// A text message received from an end user.
    pub fn from_user(sender: impl Into<String>, text: impl Into<String>) -> Self {
        HistoryMessage {
            sender: Some(sender.into()),
            message: MessageBody::Text { text: text.into() },
        }
    }

    /// A text reply previously sent by the bot.
    pub fn from_bot(text: impl Into<String>) -> Self {
        HistoryMessage {
            sender: None,
            message: MessageBody::Text { text: text.into() },
        }
    }

    /// A non-text message (attachment, quick reply, postback, ...).
    pub fn structured(sender: Option<String>, payload: serde_json::Value) -> Self {
        HistoryMessage {
            sender,
            message: MessageBody::Structured(payload),
        }
    }

    /// Whether this turn came from an end user (carries a sender attribution).
    pub fn is_from_user(&self) -> bool {
        self.sender.is_some()
    }
}

/// The payload of a stored conversation message.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum MessageBody {
    /// Plain text message.
    Text { text: String },
    /// Any non-text payload, kept as raw JSON.
    Structured(serde_json::Value),
}

impl MessageBody {
    /// Flatten the payload to prompt text.
    ///
    /// Non-empty text passes through; anything else is JSON-encoded so the
    /// model still sees the structured payload.
    pub fn to_prompt_text(&self) -> String {
        match self {
            MessageBody::Text { text } if !text.is_empty() => text.clone(),
            other => serde_json::to_string(other).unwrap_or_default(),
        }
    }
}

// ─────────────────────────────────────────────
// Generation options
// ─────────────────────────────────────────────

/// Caller-supplied partial override of the generation tuning knobs.
///
/// Every field is optional; absent fields fall back to the administrator
/// defaults during the helper's option merge. A present field wins over the
/// configured default for that key.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_call: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logit_bias: Option<HashMap<String, i32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logprobs: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parallel_tool_calls: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub presence_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_choice: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_logprobs: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f64>,
}

/// Response format constraint sent to the provider.
///
/// Serializes to the provider wire shape: `{"type": "text"}`,
/// `{"type": "json_object"}`, or `{"type": "json_schema", "json_schema": {...}}`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    JsonObject,
    JsonSchema { json_schema: JsonSchemaFormat },
}

/// Schema-constrained output request.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct JsonSchemaFormat {
    /// Identifier echoed back by the provider.
    pub name: String,
    /// Enforce the schema exactly (no extra properties, all required present).
    pub strict: bool,
    /// The JSON Schema the reply must conform to.
    pub schema: serde_json::Value,
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
