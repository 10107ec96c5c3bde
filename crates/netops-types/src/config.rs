//! Global settings for NetOps Skills.
//!
//! `Settings` represents the optional `settings.toml` at the root of a config
//! directory.

use serde::{Deserialize, Serialize};

/// Top-level settings. All fields have sensible defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Profile applied when the caller names none.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_profile: Option<String>,

    /// chrono format string used for the injected `generated_at` field.
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M UTC".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_profile: None,
            timestamp_format: default_timestamp_format(),
        }
    }
}
