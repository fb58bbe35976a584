//! Option merging — caller options over administrator defaults.
//!
//! This is the heart of the helper: it turns a [`HelperSettings`] snapshot
//! plus a caller's [`GenerationOptions`] into the [`EffectiveOptions`] set
//! attached to the outgoing request.
//!
//! # Merge contract
//!
//! 1. Connection settings (`token`, `api_base`) and `model` never enter the
//!    option set — they are handled separately.
//! 2. The base set copies the remaining defaults, except:
//!    - `seed` is absent unless the *caller* supplies a non-negative value
//!    - `stop` is absent unless the *caller* supplies a non-empty sequence
//!    - `top_logprobs` is absent unless the caller enabled `logprobs` *and*
//!      supplied a non-negative count
//!    - `logit_bias` is decoded from its JSON-encoded text form (malformed
//!      JSON is a configuration error and propagates)
//!    - `max_completion_tokens` is coerced to an integer
//! 3. Caller options overlay the base set field-by-field; a present caller
//!    field wins.
//!
//! Absent (`None`) fields are omitted from the wire entirely, which tells the
//! provider to use its own defaults.

use std::collections::HashMap;

use serde::Serialize;

use parley_core::error::HelperError;
use parley_core::types::{GenerationOptions, ResponseFormat};

use crate::settings::HelperSettings;

/// The merged, wire-ready option set.
///
/// Attached to [`ChatCompletionRequest`](crate::client::ChatCompletionRequest)
/// via `#[serde(flatten)]`.
#[derive(Clone, Debug, Default, Serialize, PartialEq)]
pub struct EffectiveOptions {
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

/// Merge caller options over the configured defaults.
pub fn build_effective_options(
    settings: &HelperSettings,
    options: &GenerationOptions,
) -> Result<EffectiveOptions, HelperError> {
    // The bias map is persisted as JSON text; malformed content is an
    // administrator error and must surface, not be papered over.
    let logit_bias: HashMap<String, i32> =
        serde_json::from_str(&settings.logit_bias).map_err(HelperError::SettingsDecode)?;

    let base = EffectiveOptions {
        temperature: finite(settings.temperature),
        max_completion_tokens: coerce_token_limit(settings.max_completion_tokens),
        frequency_penalty: finite(settings.frequency_penalty),
        function_call: Some(settings.function_call.clone()),
        logit_bias: Some(logit_bias),
        logprobs: Some(settings.logprobs),
        n: Some(settings.n),
        parallel_tool_calls: Some(settings.parallel_tool_calls),
        presence_penalty: finite(settings.presence_penalty),
        response_format: Some(response_format_from_hint(&settings.response_format)),
        // Never inherited from settings: only a valid caller value counts.
        seed: options.seed.filter(|s| *s >= 0),
        stop: options.stop.clone().filter(|s| !s.is_empty()),
        store: Some(settings.store),
        tool_choice: Some(settings.tool_choice.clone()),
        top_logprobs: if options.logprobs.unwrap_or(false) {
            options.top_logprobs.filter(|n| *n >= 0)
        } else {
            None
        },
        top_p: finite(settings.top_p),
    };

    Ok(overlay(base, options))
}

/// Overlay caller options on the base set. A present caller field wins.
///
/// `seed`, `stop`, and `top_logprobs` are not overlaid again: the base set
/// already holds the caller-resolved, validity-checked value for them.
fn overlay(base: EffectiveOptions, options: &GenerationOptions) -> EffectiveOptions {
    EffectiveOptions {
        temperature: options.temperature.or(base.temperature),
        max_completion_tokens: options.max_completion_tokens.or(base.max_completion_tokens),
        frequency_penalty: options.frequency_penalty.or(base.frequency_penalty),
        function_call: options.function_call.clone().or(base.function_call),
        logit_bias: options.logit_bias.clone().or(base.logit_bias),
        logprobs: options.logprobs.or(base.logprobs),
        n: options.n.or(base.n),
        parallel_tool_calls: options.parallel_tool_calls.or(base.parallel_tool_calls),
        presence_penalty: options.presence_penalty.or(base.presence_penalty),
        response_format: options.response_format.clone().or(base.response_format),
        seed: base.seed,
        stop: base.stop,
        store: options.store.or(base.store),
        tool_choice: options.tool_choice.clone().or(base.tool_choice),
        top_logprobs: base.top_logprobs,
        top_p: options.top_p.or(base.top_p),
    }
}

/// Map the stored response-format hint to the wire enum.
fn response_format_from_hint(hint: &str) -> ResponseFormat {
    match hint {
        "json" => ResponseFormat::JsonObject,
        _ => ResponseFormat::Text,
    }
}

/// Keep a stored numeric only if it is a usable value.
fn finite(value: f64) -> Option<f64> {
    Some(value).filter(|v| v.is_finite())
}

/// Coerce the stored token limit to an integer; invalid values become absent.
fn coerce_token_limit(value: f64) -> Option<u32> {
    if value.is_finite() && value >= 0.0 {
        Some(value as u32)
    } else {
        None
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
