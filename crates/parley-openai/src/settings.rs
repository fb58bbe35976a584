//! Administrator settings for the OpenAI helper.
//!
//! The host's settings subsystem owns persistence; this module declares the
//! schema ([`SETTINGS`]), the typed snapshot ([`HelperSettings`]) handed back
//! by [`SettingsProvider`](parley_core::SettingsProvider), and a small
//! JSON-file loader for standalone hosts and tests.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use parley_core::settings::{SettingDefault, SettingSpec, SettingType};

/// Fixed registration name of this helper.
pub const HELPER_NAME: &str = "openai";

/// Default chat-completions API base.
pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default model when the administrator has not picked one.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

// ─────────────────────────────────────────────
// Typed snapshot
// ─────────────────────────────────────────────

/// Current administrator configuration for the OpenAI helper.
///
/// `token`, `api_base`, and `model` configure the connection; the remaining
/// fields are the generation-tuning defaults merged under caller options on
/// every call. `seed`, `stop`, and `top_logprobs` are declared for
/// completeness but never inherited by a request — see
/// [`build_effective_options`](crate::options::build_effective_options).
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct HelperSettings {
    /// API credential. Rotatable at runtime via the host's settings events.
    pub token: String,
    /// Chat-completions API base URL.
    pub api_base: String,
    /// Default model id.
    pub model: String,
    pub temperature: f64,
    /// Stored as a JSON number; coerced to an integer at merge time.
    pub max_completion_tokens: f64,
    pub frequency_penalty: f64,
    pub function_call: String,
    /// JSON-encoded token-bias map (textarea in the admin UI).
    pub logit_bias: String,
    pub logprobs: bool,
    pub n: u32,
    pub parallel_tool_calls: bool,
    pub presence_penalty: f64,
    /// Response-format hint: `"text"` or `"json"`.
    pub response_format: String,
    pub seed: Option<i64>,
    pub stop: Option<String>,
    pub store: bool,
    pub tool_choice: String,
    pub top_logprobs: Option<i64>,
    pub top_p: f64,
}

impl Default for HelperSettings {
    fn default() -> Self {
        Self {
            token: String::new(),
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.8,
            max_completion_tokens: 1000.0,
            frequency_penalty: 0.0,
            function_call: "none".to_string(),
            logit_bias: "{}".to_string(),
            logprobs: false,
            n: 1,
            parallel_tool_calls: false,
            presence_penalty: 0.0,
            response_format: "text".to_string(),
            seed: None,
            stop: None,
            store: false,
            tool_choice: "auto".to_string(),
            top_logprobs: None,
            top_p: 0.9,
        }
    }
}

// ─────────────────────────────────────────────
// Schema declaration
// ─────────────────────────────────────────────

/// Settings declared to the host, in admin-UI order.
///
/// Connection settings first (no subgroup), then the tuning knobs under
/// `"options"`.
pub static SETTINGS: &[SettingSpec] = &[
    SettingSpec {
        label: "token",
        setting_type: SettingType::Secret,
        subgroup: None,
        default: SettingDefault::Text(""),
    },
    SettingSpec {
        label: "api_base",
        setting_type: SettingType::Text,
        subgroup: None,
        default: SettingDefault::Text(DEFAULT_API_BASE),
    },
    SettingSpec {
        label: "model",
        setting_type: SettingType::Text,
        subgroup: None,
        default: SettingDefault::Text(DEFAULT_MODEL),
    },
    SettingSpec {
        label: "temperature",
        setting_type: SettingType::Number,
        subgroup: Some("options"),
        default: SettingDefault::Number(0.8),
    },
    SettingSpec {
        label: "max_completion_tokens",
        setting_type: SettingType::Number,
        subgroup: Some("options"),
        default: SettingDefault::Number(1000.0),
    },
    SettingSpec {
        label: "frequency_penalty",
        setting_type: SettingType::Number,
        subgroup: Some("options"),
        default: SettingDefault::Number(0.0),
    },
    SettingSpec {
        label: "function_call",
        setting_type: SettingType::Text,
        subgroup: Some("options"),
        default: SettingDefault::Text("none"),
    },
    SettingSpec {
        label: "logit_bias",
        setting_type: SettingType::Textarea,
        subgroup: Some("options"),
        default: SettingDefault::Text("{}"),
    },
    SettingSpec {
        label: "logprobs",
        setting_type: SettingType::Checkbox,
        subgroup: Some("options"),
        default: SettingDefault::Bool(false),
    },
    SettingSpec {
        label: "n",
        setting_type: SettingType::Number,
        subgroup: Some("options"),
        default: SettingDefault::Number(1.0),
    },
    SettingSpec {
        label: "parallel_tool_calls",
        setting_type: SettingType::Checkbox,
        subgroup: Some("options"),
        default: SettingDefault::Bool(false),
    },
    SettingSpec {
        label: "presence_penalty",
        setting_type: SettingType::Number,
        subgroup: Some("options"),
        default: SettingDefault::Number(0.0),
    },
    SettingSpec {
        label: "response_format",
        setting_type: SettingType::Text,
        subgroup: Some("options"),
        default: SettingDefault::Text("text"),
    },
    SettingSpec {
        label: "seed",
        setting_type: SettingType::Number,
        subgroup: Some("options"),
        default: SettingDefault::None,
    },
    SettingSpec {
        label: "stop",
        setting_type: SettingType::Text,
        subgroup: Some("options"),
        default: SettingDefault::None,
    },
    SettingSpec {
        label: "store",
        setting_type: SettingType::Checkbox,
        subgroup: Some("options"),
        default: SettingDefault::Bool(false),
    },
    SettingSpec {
        label: "tool_choice",
        setting_type: SettingType::Text,
        subgroup: Some("options"),
        default: SettingDefault::Text("auto"),
    },
    SettingSpec {
        label: "top_logprobs",
        setting_type: SettingType::Number,
        subgroup: Some("options"),
        default: SettingDefault::None,
    },
    SettingSpec {
        label: "top_p",
        setting_type: SettingType::Number,
        subgroup: Some("options"),
        default: SettingDefault::Number(0.9),
    },
];

// ─────────────────────────────────────────────
// File loader
// ─────────────────────────────────────────────

/// Load settings from a JSON file, then apply env-var overrides.
///
/// Falls back to defaults if the file is missing or unparseable — a broken
/// settings file should not take the helper down.
pub fn load_settings(path: &Path) -> HelperSettings {
    let settings = if path.exists() {
        debug!("loading helper settings from {}", path.display());
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(settings) => settings,
                Err(e) => {
                    warn!("failed to parse settings file {}: {}", path.display(), e);
                    HelperSettings::default()
                }
            },
            Err(e) => {
                warn!("failed to read settings file {}: {}", path.display(), e);
                HelperSettings::default()
            }
        }
    } else {
        debug!("no settings file at {}, using defaults", path.display());
        HelperSettings::default()
    };

    apply_env_overrides(settings)
}

/// Apply environment variable overrides on top of loaded settings.
///
/// - `PARLEY_OPENAI__TOKEN` → `token`
/// - `PARLEY_OPENAI__MODEL` → `model`
/// - `PARLEY_OPENAI__API_BASE` → `api_base`
fn apply_env_overrides(mut settings: HelperSettings) -> HelperSettings {
    if let Ok(val) = std::env::var("PARLEY_OPENAI__TOKEN") {
        settings.token = val;
    }
    if let Ok(val) = std::env::var("PARLEY_OPENAI__MODEL") {
        settings.model = val;
    }
    if let Ok(val) = std::env::var("PARLEY_OPENAI__API_BASE") {
        settings.api_base = val;
    }
    settings
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
