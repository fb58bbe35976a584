//! LLM helper trait — the abstract interface every LLM plugin must implement.
//!
//! Each helper (OpenAI, and whatever comes next) implements this trait to:
//! - `name()` — fixed identifying name used for registration and event routing
//! - `path()` — filesystem location for host asset discovery
//! - `on_application_bootstrap()` — lifecycle hook that builds the live client
//! - the three generator operations (free text, schema-constrained, multi-turn)

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::error::HelperError;
use crate::types::{GenerationOptions, HistoryMessage};

/// Every LLM helper plugin implements this trait.
///
/// The host holds `Arc<dyn LlmHelper>` in a [`HelperRegistry`] and dispatches
/// conversation-pipeline calls through it.
#[async_trait]
pub trait LlmHelper: Send + Sync {
    /// Unique helper name, matching the settings group and event channel.
    fn name(&self) -> &'static str;

    /// Filesystem location of the helper, for host asset discovery.
    fn path(&self) -> &Path;

    /// Application-bootstrap hook. Builds the live provider client from the
    /// current settings snapshot.
    async fn on_application_bootstrap(&self) -> Result<(), HelperError>;

    /// Generate a free-text response for a single prompt.
    async fn generate_response(
        &self,
        prompt: &str,
        model: &str,
        system_prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, HelperError>;

    /// Generate a schema-constrained response and return the parsed result
    /// value.
    ///
    /// `schema` describes the shape of the expected result; `model` falls
    /// back to the configured default when absent.
    async fn generate_structured(
        &self,
        prompt: &str,
        model: Option<&str>,
        system_prompt: &str,
        schema: &serde_json::Value,
        options: &GenerationOptions,
    ) -> Result<serde_json::Value, HelperError>;

    /// Generate a response with the conversation history included.
    ///
    /// The same approach works for multi-shot or chain-of-thought prompting:
    /// seed `history` with the turns you want the model to see.
    async fn generate_chat_completion(
        &self,
        prompt: &str,
        model: &str,
        system_prompt: &str,
        history: &[HistoryMessage],
        options: &GenerationOptions,
    ) -> Result<String, HelperError>;
}

// ─────────────────────────────────────────────
// HelperRegistry
// ─────────────────────────────────────────────

/// Name-keyed registry of installed LLM helpers.
#[derive(Default)]
pub struct HelperRegistry {
    helpers: RwLock<HashMap<&'static str, Arc<dyn LlmHelper>>>,
}

impl HelperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a helper under its fixed name.
    ///
    /// Registering two helpers with the same name is an error.
    pub async fn register(&self, helper: Arc<dyn LlmHelper>) -> Result<(), HelperError> {
        let name = helper.name();
        let mut helpers = self.helpers.write().await;
        if helpers.contains_key(name) {
            return Err(HelperError::AlreadyRegistered {
                name: name.to_string(),
            });
        }
        helpers.insert(name, helper);
        info!(helper = name, "registered LLM helper");
        Ok(())
    }

    /// Look up a helper by name.
    pub async fn get(&self, name: &str) -> Option<Arc<dyn LlmHelper>> {
        self.helpers.read().await.get(name).cloned()
    }

    /// Names of all registered helpers.
    pub async fn names(&self) -> Vec<&'static str> {
        self.helpers.read().await.keys().copied().collect()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
