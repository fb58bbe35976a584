//! Settings plumbing — schema declaration rows and the provider abstraction
//! over the host's settings subsystem.
//!
//! Helpers *declare* their administrator settings as a static list of
//! [`SettingSpec`] rows; the host's settings subsystem owns persistence and
//! hands back current snapshots through [`SettingsProvider`].

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::HelperError;

// ─────────────────────────────────────────────
// Schema declaration
// ─────────────────────────────────────────────

/// Input control rendered by the host UI for one setting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingType {
    Secret,
    Text,
    Number,
    Checkbox,
    Textarea,
}

impl SettingType {
    /// Wire name used by the host's settings subsystem.
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingType::Secret => "secret",
            SettingType::Text => "text",
            SettingType::Number => "number",
            SettingType::Checkbox => "checkbox",
            SettingType::Textarea => "textarea",
        }
    }
}

/// Default value of a declared setting (const-constructible).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SettingDefault {
    None,
    Bool(bool),
    Number(f64),
    Text(&'static str),
}

impl SettingDefault {
    /// Convert to the JSON value persisted by the settings subsystem.
    pub fn to_value(&self) -> serde_json::Value {
        match self {
            SettingDefault::None => serde_json::Value::Null,
            SettingDefault::Bool(b) => serde_json::Value::Bool(*b),
            SettingDefault::Number(n) => serde_json::Value::from(*n),
            SettingDefault::Text(s) => serde_json::Value::String((*s).to_string()),
        }
    }
}

/// Declaration of one administrator setting.
///
/// Helpers expose a `static` slice of these; the host seeds its settings
/// store from them and renders the admin UI accordingly.
#[derive(Clone, Debug)]
pub struct SettingSpec {
    /// Setting key (e.g. `"temperature"`).
    pub label: &'static str,
    /// UI control / storage type.
    pub setting_type: SettingType,
    /// Optional grouping below the helper's own namespace.
    pub subgroup: Option<&'static str>,
    /// Default value seeded on first install.
    pub default: SettingDefault,
}

impl SettingSpec {
    /// Render the declaration row the host's settings subsystem consumes.
    pub fn declaration(&self, group: &str) -> serde_json::Value {
        let mut row = serde_json::json!({
            "label": self.label,
            "group": group,
            "type": self.setting_type.as_str(),
            "value": self.default.to_value(),
        });
        if let Some(subgroup) = self.subgroup {
            row["subgroup"] = serde_json::Value::String(subgroup.to_string());
        }
        row
    }
}

// ─────────────────────────────────────────────
// Settings provider
// ─────────────────────────────────────────────

/// Async access to the current administrator configuration snapshot.
///
/// Implementations may suspend on I/O. The only freshness guarantee required
/// of an implementation is that the returned snapshot reflects the latest
/// value set before the call returns.
#[async_trait]
pub trait SettingsProvider<S>: Send + Sync {
    async fn get_settings(&self) -> Result<S, HelperError>;
}

/// In-memory snapshot store.
///
/// Used by hosts that already hold the settings in memory, and by tests.
/// `replace` swaps the whole snapshot so later `get_settings` calls see it.
pub struct MemorySettings<S> {
    inner: RwLock<S>,
}

impl<S: Clone + Send + Sync + 'static> MemorySettings<S> {
    pub fn new(settings: S) -> Self {
        MemorySettings {
            inner: RwLock::new(settings),
        }
    }

    /// Replace the stored snapshot.
    pub async fn replace(&self, settings: S) {
        *self.inner.write().await = settings;
    }
}

#[async_trait]
impl<S: Clone + Send + Sync + 'static> SettingsProvider<S> for MemorySettings<S> {
    async fn get_settings(&self) -> Result<S, HelperError> {
        Ok(self.inner.read().await.clone())
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
