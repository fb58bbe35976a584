//! Fault taxonomy shared by all LLM helpers.
//!
//! Every fault is terminal for the current call: helpers never retry and
//! never return partial results. Higher-level recovery (user-facing fallback
//! messaging, retries) belongs to the host conversation pipeline.

use thiserror::Error;

/// Errors raised by LLM helper plugins.
#[derive(Debug, Error)]
pub enum HelperError {
    /// The provider replied without usable message content.
    #[error("no response generated by {method}")]
    NoResponseGenerated {
        /// The generator method that observed the empty reply.
        method: &'static str,
    },

    /// A configuration value held malformed JSON (e.g. the logit-bias map).
    ///
    /// Treated as an administrator error — propagates uncaught.
    #[error("malformed JSON in setting value: {0}")]
    SettingsDecode(#[source] serde_json::Error),

    /// A provider payload could not be decoded (structured-output replies).
    #[error("malformed JSON in provider response: {0}")]
    ResponseDecode(#[source] serde_json::Error),

    /// Network-level failure talking to the provider.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The provider answered with a non-success status.
    #[error("provider API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// A helper with the same name is already registered.
    #[error("helper '{name}' is already registered")]
    AlreadyRegistered { name: String },
}
