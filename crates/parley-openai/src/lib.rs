//! OpenAI chat-completion helper for Parley.
//!
//! # Architecture
//!
//! - [`settings`] — administrator settings: typed snapshot, declaration rows,
//!   JSON-file loader with env overrides
//! - [`options`] — merge of caller options over configured defaults into the
//!   wire-ready option set
//! - [`client`] — thin `reqwest` wrapper over the `/chat/completions` endpoint
//! - [`helper`] — [`OpenAiHelper`]: the plugin itself, with a rotatable client
//!   handle and the three generator operations

pub mod client;
pub mod helper;
pub mod options;
pub mod settings;

// Re-export main types for convenience
pub use client::OpenAiClient;
pub use helper::OpenAiHelper;
pub use options::{build_effective_options, EffectiveOptions};
pub use settings::{load_settings, HelperSettings, HELPER_NAME, SETTINGS};
