//! The OpenAI helper plugin.
//!
//! Resolves administrator settings, merges caller options, composes
//! chat-completion requests (plain, schema-constrained, or with history),
//! and extracts the reply. Holds the live [`OpenAiClient`] behind an
//! atomically-replaceable handle so credential rotation never disturbs
//! in-flight calls.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use parley_core::error::HelperError;
use parley_core::helper::LlmHelper;
use parley_core::settings::SettingsProvider;
use parley_core::types::{
    GenerationOptions, HistoryMessage, JsonSchemaFormat, ResponseFormat,
};

use crate::client::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, OpenAiClient, Role};
use crate::options::{build_effective_options, EffectiveOptions};
use crate::settings::{HelperSettings, HELPER_NAME};

/// The OpenAI chat-completion helper.
pub struct OpenAiHelper {
    /// Host settings subsystem handle.
    settings: Arc<dyn SettingsProvider<HelperSettings>>,
    /// Live client. Lazily built from settings; replaced wholesale on
    /// credential rotation. Readers clone the `Arc` and release the lock
    /// before touching the network.
    client: RwLock<Option<Arc<OpenAiClient>>>,
    /// Plugin location for host asset discovery.
    path: PathBuf,
}

impl OpenAiHelper {
    pub fn new(settings: Arc<dyn SettingsProvider<HelperSettings>>) -> Self {
        OpenAiHelper {
            settings,
            client: RwLock::new(None),
            path: PathBuf::from(env!("CARGO_MANIFEST_DIR")),
        }
    }

    /// Override the plugin path (hosts that relocate plugin assets).
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    /// Current client handle, building it from settings on first use.
    async fn client(&self) -> Result<Arc<OpenAiClient>, HelperError> {
        if let Some(client) = self.client.read().await.as_ref() {
            return Ok(Arc::clone(client));
        }
        self.rebuild_client().await
    }

    /// Build a fresh client from the current settings snapshot and publish it.
    async fn rebuild_client(&self) -> Result<Arc<OpenAiClient>, HelperError> {
        let settings = self.settings.get_settings().await?;
        let client = Arc::new(OpenAiClient::new(settings.token, settings.api_base));
        info!(helper = HELPER_NAME, "constructed OpenAI client");
        *self.client.write().await = Some(Arc::clone(&client));
        Ok(client)
    }

    /// Swap in a client built with a rotated credential.
    ///
    /// Invoked by the host's settings-event dispatcher. In-flight calls keep
    /// the handle they already cloned and complete against the old
    /// credential.
    pub async fn update_credential(&self, token: &str) -> Result<(), HelperError> {
        if token.is_empty() {
            warn!(helper = HELPER_NAME, "ignoring empty credential update");
            return Ok(());
        }
        let settings = self.settings.get_settings().await?;
        let client = Arc::new(OpenAiClient::new(token, settings.api_base));
        info!(helper = HELPER_NAME, "credential rotated, client replaced");
        *self.client.write().await = Some(client);
        Ok(())
    }

    /// Merge caller options over the current administrator defaults.
    pub async fn build_options(
        &self,
        options: &GenerationOptions,
    ) -> Result<EffectiveOptions, HelperError> {
        let settings = self.settings.get_settings().await?;
        build_effective_options(&settings, options)
    }

    /// Schema-constrained generation, deserialized into `T`.
    ///
    /// A reply whose `result` does not match `T` fails with
    /// [`HelperError::ResponseDecode`] instead of being handed over mistyped.
    pub async fn generate_structured_as<T>(
        &self,
        prompt: &str,
        model: Option<&str>,
        system_prompt: &str,
        schema: &serde_json::Value,
        options: &GenerationOptions,
    ) -> Result<T, HelperError>
    where
        T: DeserializeOwned,
    {
        let value = self
            .generate_structured(prompt, model, system_prompt, schema, options)
            .await?;
        serde_json::from_value(value).map_err(HelperError::ResponseDecode)
    }
}

/// Wrap a result schema in the strict single-property envelope the provider
/// expects: an object with exactly one required `result` property and no
/// additional properties.
fn wrap_schema(schema: &serde_json::Value) -> serde_json::Value {
    json!({
        "type": "object",
        "properties": { "result": schema },
        "required": ["result"],
        "additionalProperties": false,
    })
}

/// Normalize stored history into provider messages.
///
/// A turn with a sender attribution came from the end user; one without is
/// the bot's own reply. Non-text payloads are JSON-encoded.
fn format_history(history: &[HistoryMessage]) -> Vec<ChatMessage> {
    history
        .iter()
        .map(|turn| ChatMessage {
            role: if turn.is_from_user() {
                Role::User
            } else {
                Role::Assistant
            },
            content: turn.message.to_prompt_text(),
        })
        .collect()
}

/// Pull the first choice's content out of a completion, or fail naming the
/// calling method. No further processing happens after an empty reply.
fn extract_content(
    response: ChatCompletionResponse,
    method: &'static str,
) -> Result<String, HelperError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.is_empty())
        .ok_or(HelperError::NoResponseGenerated { method })
}

/// Structured replies arrive wrapped in the `result` envelope.
#[derive(Debug, Deserialize)]
struct StructuredEnvelope {
    result: serde_json::Value,
}

#[async_trait]
impl LlmHelper for OpenAiHelper {
    fn name(&self) -> &'static str {
        HELPER_NAME
    }

    fn path(&self) -> &Path {
        &self.path
    }

    async fn on_application_bootstrap(&self) -> Result<(), HelperError> {
        self.rebuild_client().await?;
        Ok(())
    }

    async fn generate_response(
        &self,
        prompt: &str,
        model: &str,
        system_prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, HelperError> {
        let mut merged = self.build_options(options).await?;
        merged.response_format = Some(ResponseFormat::Text);

        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(prompt),
            ],
            stream: false,
            options: merged,
        };

        let completion = self.client().await?.chat_completions(&request).await?;
        extract_content(completion, "generate_response")
    }

    async fn generate_structured(
        &self,
        prompt: &str,
        model: Option<&str>,
        system_prompt: &str,
        schema: &serde_json::Value,
        options: &GenerationOptions,
    ) -> Result<serde_json::Value, HelperError> {
        let settings = self.settings.get_settings().await?;
        let mut merged = build_effective_options(&settings, options)?;

        // Deterministic extraction unless the caller explicitly tuned it.
        merged.temperature = Some(options.temperature.filter(|t| *t != 0.0).unwrap_or(0.0));
        merged.response_format = Some(ResponseFormat::JsonSchema {
            json_schema: JsonSchemaFormat {
                name: "structured_response".to_string(),
                strict: true,
                schema: wrap_schema(schema),
            },
        });

        let model = model.unwrap_or(&settings.model);
        debug!(helper = HELPER_NAME, model, "structured generation");

        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(prompt),
            ],
            stream: false,
            options: merged,
        };

        let completion = self.client().await?.chat_completions(&request).await?;
        let content = extract_content(completion, "generate_structured")?;
        let envelope: StructuredEnvelope =
            serde_json::from_str(&content).map_err(HelperError::ResponseDecode)?;
        Ok(envelope.result)
    }

    async fn generate_chat_completion(
        &self,
        prompt: &str,
        model: &str,
        system_prompt: &str,
        history: &[HistoryMessage],
        options: &GenerationOptions,
    ) -> Result<String, HelperError> {
        // Same defaults merge as the single-turn path: administrator
        // defaults stay authoritative for every generation path.
        let merged = self.build_options(options).await?;

        let mut messages = Vec::with_capacity(history.len() + 2);
        messages.push(ChatMessage::system(system_prompt));
        messages.extend(format_history(history));
        messages.push(ChatMessage::user(prompt));

        let request = ChatCompletionRequest {
            model: model.to_string(),
            messages,
            stream: false,
            options: merged,
        };

        let completion = self.client().await?.chat_completions(&request).await?;
        extract_content(completion, "generate_chat_completion")
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::settings::MemorySettings;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// A helper wired to the mock server.
    fn helper_for(server: &MockServer) -> OpenAiHelper {
        helper_with(server, HelperSettings::default())
    }

    fn helper_with(server: &MockServer, mut settings: HelperSettings) -> OpenAiHelper {
        settings.api_base = server.uri();
        if settings.token.is_empty() {
            settings.token = "test-key".to_string();
        }
        OpenAiHelper::new(Arc::new(MemorySettings::new(settings)))
    }

    fn completion(content: serde_json::Value) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-test",
            "choices": [{
                "message": { "content": content },
                "finish_reason": "stop"
            }]
        }))
    }

    async fn mount_any(server: &MockServer, content: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(completion(content))
            .mount(server)
            .await;
    }

    async fn last_request_body(server: &MockServer) -> serde_json::Value {
        let requests = server.received_requests().await.unwrap();
        serde_json::from_slice(&requests.last().unwrap().body).unwrap()
    }

    // ── generate_response ──

    #[tokio::test]
    async fn test_generate_response_returns_content() {
        let server = MockServer::start().await;
        mount_any(&server, json!("The answer.")).await;

        let helper = helper_for(&server);
        let reply = helper
            .generate_response("question?", "gpt-4o-mini", "be brief", &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(reply, "The answer.");
    }

    #[tokio::test]
    async fn test_generate_response_request_shape() {
        let server = MockServer::start().await;
        mount_any(&server, json!("ok")).await;

        let helper = helper_for(&server);
        helper
            .generate_response("hello", "gpt-4o-mini", "system says", &GenerationOptions::default())
            .await
            .unwrap();

        let body = last_request_body(&server).await;
        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["stream"], false);
        // Plain-text generation always forces the text response format.
        assert_eq!(body["response_format"], json!({"type": "text"}));
        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], json!({"role": "system", "content": "system says"}));
        assert_eq!(messages[1], json!({"role": "user", "content": "hello"}));
    }

    #[tokio::test]
    async fn test_generate_response_merges_defaults() {
        let server = MockServer::start().await;
        mount_any(&server, json!("ok")).await;

        let helper = helper_for(&server);
        helper
            .generate_response("hi", "gpt-4o-mini", "sys", &GenerationOptions::default())
            .await
            .unwrap();

        let body = last_request_body(&server).await;
        assert_eq!(body["temperature"].as_f64(), Some(0.8));
        assert_eq!(body["top_p"].as_f64(), Some(0.9));
        assert_eq!(body["max_completion_tokens"], 1000);
        assert_eq!(body["logit_bias"], json!({}));
        assert_eq!(body["tool_choice"], "auto");
        // Defaults never leak seed or stop into the request.
        assert!(body.get("seed").is_none());
        assert!(body.get("stop").is_none());
    }

    #[tokio::test]
    async fn test_generate_response_caller_options_win() {
        let server = MockServer::start().await;
        mount_any(&server, json!("ok")).await;

        let helper = helper_for(&server);
        let options = GenerationOptions {
            temperature: Some(0.2),
            seed: Some(42),
            ..Default::default()
        };
        helper
            .generate_response("hi", "gpt-4o-mini", "sys", &options)
            .await
            .unwrap();

        let body = last_request_body(&server).await;
        assert_eq!(body["temperature"].as_f64(), Some(0.2));
        assert_eq!(body["seed"], 42);
    }

    #[tokio::test]
    async fn test_generate_response_null_content_fails() {
        let server = MockServer::start().await;
        mount_any(&server, json!(null)).await;

        let helper = helper_for(&server);
        let err = helper
            .generate_response("hi", "gpt-4o-mini", "sys", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            HelperError::NoResponseGenerated { method: "generate_response" }
        ));
    }

    #[tokio::test]
    async fn test_generate_response_empty_content_fails() {
        let server = MockServer::start().await;
        mount_any(&server, json!("")).await;

        let helper = helper_for(&server);
        let err = helper
            .generate_response("hi", "gpt-4o-mini", "sys", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, HelperError::NoResponseGenerated { .. }));
    }

    // ── generate_structured ──

    #[tokio::test]
    async fn test_structured_envelope_on_wire() {
        let server = MockServer::start().await;
        mount_any(&server, json!(r#"{"result": "hello"}"#)).await;

        let helper = helper_for(&server);
        let schema = json!({"type": "string"});
        let value = helper
            .generate_structured("extract", None, "sys", &schema, &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(value, json!("hello"));

        let body = last_request_body(&server).await;
        assert_eq!(
            body["response_format"],
            json!({
                "type": "json_schema",
                "json_schema": {
                    "name": "structured_response",
                    "strict": true,
                    "schema": {
                        "type": "object",
                        "properties": { "result": {"type": "string"} },
                        "required": ["result"],
                        "additionalProperties": false
                    }
                }
            })
        );
    }

    #[tokio::test]
    async fn test_structured_temperature_forced_to_zero() {
        let server = MockServer::start().await;
        mount_any(&server, json!(r#"{"result": 1}"#)).await;

        // Administrator default is 0.8, but extraction should be
        // deterministic when the caller does not say otherwise.
        let helper = helper_for(&server);
        helper
            .generate_structured("x", None, "sys", &json!({"type": "number"}), &GenerationOptions::default())
            .await
            .unwrap();

        let body = last_request_body(&server).await;
        assert_eq!(body["temperature"].as_f64(), Some(0.0));
    }

    #[tokio::test]
    async fn test_structured_caller_temperature_respected() {
        let server = MockServer::start().await;
        mount_any(&server, json!(r#"{"result": 1}"#)).await;

        let helper = helper_for(&server);
        let options = GenerationOptions {
            temperature: Some(0.5),
            ..Default::default()
        };
        helper
            .generate_structured("x", None, "sys", &json!({"type": "number"}), &options)
            .await
            .unwrap();

        let body = last_request_body(&server).await;
        assert_eq!(body["temperature"].as_f64(), Some(0.5));
    }

    #[tokio::test]
    async fn test_structured_model_falls_back_to_settings() {
        let server = MockServer::start().await;
        mount_any(&server, json!(r#"{"result": true}"#)).await;

        let mut settings = HelperSettings::default();
        settings.model = "gpt-4o".to_string();
        let helper = helper_with(&server, settings);

        helper
            .generate_structured("x", None, "sys", &json!({"type": "boolean"}), &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(last_request_body(&server).await["model"], "gpt-4o");

        helper
            .generate_structured("x", Some("gpt-4.1"), "sys", &json!({"type": "boolean"}), &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(last_request_body(&server).await["model"], "gpt-4.1");
    }

    #[tokio::test]
    async fn test_structured_typed_deserialization() {
        #[derive(Debug, Deserialize, PartialEq)]
        struct Intent {
            label: String,
            confidence: f64,
        }

        let server = MockServer::start().await;
        mount_any(
            &server,
            json!(r#"{"result": {"label": "greeting", "confidence": 0.97}}"#),
        )
        .await;

        let helper = helper_for(&server);
        let schema = json!({
            "type": "object",
            "properties": {
                "label": {"type": "string"},
                "confidence": {"type": "number"}
            },
            "required": ["label", "confidence"]
        });
        let intent: Intent = helper
            .generate_structured_as("classify", None, "sys", &schema, &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(
            intent,
            Intent {
                label: "greeting".to_string(),
                confidence: 0.97
            }
        );
    }

    #[tokio::test]
    async fn test_structured_shape_mismatch_fails_typed() {
        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        struct Expected {
            count: u32,
        }

        let server = MockServer::start().await;
        mount_any(&server, json!(r#"{"result": "not an object"}"#)).await;

        let helper = helper_for(&server);
        let err = helper
            .generate_structured_as::<Expected>(
                "x",
                None,
                "sys",
                &json!({"type": "object"}),
                &GenerationOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, HelperError::ResponseDecode(_)));
    }

    #[tokio::test]
    async fn test_structured_malformed_json_fails() {
        let server = MockServer::start().await;
        mount_any(&server, json!("this is not json")).await;

        let helper = helper_for(&server);
        let err = helper
            .generate_structured("x", None, "sys", &json!({"type": "string"}), &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, HelperError::ResponseDecode(_)));
    }

    #[tokio::test]
    async fn test_structured_empty_content_fails_before_parsing() {
        let server = MockServer::start().await;
        mount_any(&server, json!(null)).await;

        let helper = helper_for(&server);
        let err = helper
            .generate_structured("x", None, "sys", &json!({"type": "string"}), &GenerationOptions::default())
            .await
            .unwrap_err();
        // The empty reply surfaces as-is; no JSON parse is attempted.
        assert!(matches!(
            err,
            HelperError::NoResponseGenerated { method: "generate_structured" }
        ));
    }

    // ── generate_chat_completion ──

    #[tokio::test]
    async fn test_chat_completion_normalizes_history() {
        let server = MockServer::start().await;
        mount_any(&server, json!("done")).await;

        let history = vec![
            HistoryMessage::from_user("user-1", "first question"),
            HistoryMessage::from_bot("first answer"),
            HistoryMessage::structured(Some("user-1".into()), json!({"menu": ["a", "b"]})),
        ];

        let helper = helper_for(&server);
        let reply = helper
            .generate_chat_completion(
                "follow-up",
                "gpt-4o-mini",
                "be helpful",
                &history,
                &GenerationOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(reply, "done");

        let body = last_request_body(&server).await;
        let messages = body["messages"].as_array().unwrap();
        // system + history + final prompt, order preserved
        assert_eq!(messages.len(), history.len() + 2);
        assert_eq!(messages[0], json!({"role": "system", "content": "be helpful"}));
        assert_eq!(messages[1], json!({"role": "user", "content": "first question"}));
        assert_eq!(messages[2], json!({"role": "assistant", "content": "first answer"}));
        assert_eq!(
            messages[3],
            json!({"role": "user", "content": r#"{"menu":["a","b"]}"#})
        );
        assert_eq!(messages[4], json!({"role": "user", "content": "follow-up"}));
    }

    #[tokio::test]
    async fn test_chat_completion_merges_defaults() {
        let server = MockServer::start().await;
        mount_any(&server, json!("ok")).await;

        let helper = helper_for(&server);
        helper
            .generate_chat_completion("hi", "gpt-4o-mini", "sys", &[], &GenerationOptions::default())
            .await
            .unwrap();

        let body = last_request_body(&server).await;
        // History-augmented calls honor administrator defaults too.
        assert_eq!(body["temperature"].as_f64(), Some(0.8));
        assert_eq!(body["stream"], false);
    }

    #[tokio::test]
    async fn test_chat_completion_empty_content_fails() {
        let server = MockServer::start().await;
        mount_any(&server, json!(null)).await;

        let helper = helper_for(&server);
        let err = helper
            .generate_chat_completion("hi", "gpt-4o-mini", "sys", &[], &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            HelperError::NoResponseGenerated { method: "generate_chat_completion" }
        ));
    }

    // ── client lifecycle ──

    #[tokio::test]
    async fn test_bootstrap_builds_client() {
        let server = MockServer::start().await;
        let helper = helper_for(&server);

        assert!(helper.client.read().await.is_none());
        helper.on_application_bootstrap().await.unwrap();
        assert!(helper.client.read().await.is_some());
    }

    #[tokio::test]
    async fn test_client_built_lazily_on_first_call() {
        let server = MockServer::start().await;
        mount_any(&server, json!("ok")).await;

        let helper = helper_for(&server);
        assert!(helper.client.read().await.is_none());
        helper
            .generate_response("hi", "gpt-4o-mini", "sys", &GenerationOptions::default())
            .await
            .unwrap();
        assert!(helper.client.read().await.is_some());
    }

    #[tokio::test]
    async fn test_credential_rotation_swaps_client() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer old-key"))
            .respond_with(completion(json!("from old")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer new-key"))
            .respond_with(completion(json!("from new")))
            .mount(&server)
            .await;

        let mut settings = HelperSettings::default();
        settings.token = "old-key".to_string();
        let helper = helper_with(&server, settings);

        let reply = helper
            .generate_response("hi", "gpt-4o-mini", "sys", &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(reply, "from old");

        helper.update_credential("new-key").await.unwrap();

        let reply = helper
            .generate_response("hi", "gpt-4o-mini", "sys", &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(reply, "from new");
    }

    #[tokio::test]
    async fn test_rotation_leaves_old_handle_usable() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("Authorization", "Bearer old-key"))
            .respond_with(completion(json!("from old")))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(header("Authorization", "Bearer new-key"))
            .respond_with(completion(json!("from new")))
            .mount(&server)
            .await;

        let mut settings = HelperSettings::default();
        settings.token = "old-key".to_string();
        let helper = helper_with(&server, settings);

        // Simulate an in-flight call: grab the handle, then rotate.
        let old_client = helper.client().await.unwrap();
        helper.update_credential("new-key").await.unwrap();

        let request = ChatCompletionRequest {
            model: "gpt-4o-mini".to_string(),
            messages: vec![ChatMessage::user("hi")],
            stream: false,
            options: EffectiveOptions::default(),
        };
        let response = old_client.chat_completions(&request).await.unwrap();
        assert_eq!(response.choices[0].message.content.as_deref(), Some("from old"));
    }

    #[tokio::test]
    async fn test_empty_credential_update_ignored() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("Authorization", "Bearer old-key"))
            .respond_with(completion(json!("from old")))
            .mount(&server)
            .await;

        let mut settings = HelperSettings::default();
        settings.token = "old-key".to_string();
        let helper = helper_with(&server, settings);
        helper.on_application_bootstrap().await.unwrap();

        helper.update_credential("").await.unwrap();

        // Still on the old credential.
        let reply = helper
            .generate_response("hi", "gpt-4o-mini", "sys", &GenerationOptions::default())
            .await
            .unwrap();
        assert_eq!(reply, "from old");
    }

    // ── plugin contract ──

    #[tokio::test]
    async fn test_helper_name_and_path() {
        let server = MockServer::start().await;
        let helper = helper_for(&server).with_path("/opt/parley/helpers/openai");
        assert_eq!(helper.name(), "openai");
        assert_eq!(helper.path(), Path::new("/opt/parley/helpers/openai"));
    }

    #[tokio::test]
    async fn test_transport_fault_propagates() {
        let settings = HelperSettings {
            token: "key".to_string(),
            api_base: "http://127.0.0.1:1".to_string(),
            ..Default::default()
        };
        let helper = OpenAiHelper::new(Arc::new(MemorySettings::new(settings)));
        let err = helper
            .generate_response("hi", "gpt-4o-mini", "sys", &GenerationOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, HelperError::Transport(_)));
    }

    // Scalar body matchers compose with mounted expectations too.
    #[tokio::test]
    async fn test_stream_disabled_matcher() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({"stream": false})))
            .respond_with(completion(json!("ok")))
            .expect(1)
            .mount(&server)
            .await;

        let helper = helper_for(&server);
        helper
            .generate_response("hi", "gpt-4o-mini", "sys", &GenerationOptions::default())
            .await
            .unwrap();
    }
}
