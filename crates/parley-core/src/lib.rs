//! Parley core — shared contracts between the host and its LLM helper plugins.
//!
//! This crate contains:
//! - **helper**: the [`LlmHelper`] trait every LLM plugin implements, plus the
//!   name-keyed [`HelperRegistry`]
//! - **settings**: the settings-schema declaration types and the async
//!   [`SettingsProvider`] abstraction over the host's settings subsystem
//! - **types**: conversation-history messages and caller-supplied generation
//!   options
//! - **error**: the [`HelperError`] fault taxonomy shared by all helpers

pub mod error;
pub mod helper;
pub mod settings;
pub mod types;

// Re-export main types for convenience
pub use error::HelperError;
pub use helper::{HelperRegistry, LlmHelper};
pub use settings::{MemorySettings, SettingDefault, SettingSpec, SettingType, SettingsProvider};
pub use types::{GenerationOptions, HistoryMessage, JsonSchemaFormat, MessageBody, ResponseFormat};
