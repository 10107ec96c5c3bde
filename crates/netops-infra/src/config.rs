//! Settings loader.
//!
//! Reads `settings.toml` from the config source and deserializes it into
//! [`Settings`]. A missing file yields the defaults; a malformed one is an
//! error.

use netops_types::config::Settings;
use netops_types::error::ConfigError;

use crate::source::ConfigSource;

const SETTINGS_FILE: &str = "settings.toml";

/// Load settings from `{source}/settings.toml`.
pub fn load_settings(source: &ConfigSource) -> Result<Settings, ConfigError> {
    let Some(content) = source.read_optional(SETTINGS_FILE)? else {
        tracing::debug!(%source, "no settings.toml, using defaults");
        return Ok(Settings::default());
    };
    parse_settings(&content)
}

pub fn parse_settings(content: &str) -> Result<Settings, ConfigError> {
    toml::from_str(content).map_err(|err| ConfigError::Parse {
        source_name: SETTINGS_FILE.to_string(),
        message: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_settings_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let settings = load_settings(&ConfigSource::Directory(tmp.path().to_path_buf())).unwrap();
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn load_settings_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(
            tmp.path().join("settings.toml"),
            r#"
default_profile = "client-comms"
timestamp_format = "%d/%m/%Y"
"#,
        )
        .unwrap();

        let settings = load_settings(&ConfigSource::Directory(tmp.path().to_path_buf())).unwrap();
        assert_eq!(settings.default_profile.as_deref(), Some("client-comms"));
        assert_eq!(settings.timestamp_format, "%d/%m/%Y");
    }

    #[test]
    fn load_settings_invalid_toml_is_an_error() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("settings.toml"), "this is not { valid toml !!!").unwrap();

        let err = load_settings(&ConfigSource::Directory(tmp.path().to_path_buf())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { ref source_name, .. } if source_name == "settings.toml"));
    }

    #[test]
    fn embedded_settings_parse() {
        let settings = load_settings(&ConfigSource::Embedded).unwrap();
        assert_eq!(settings.timestamp_format, "%Y-%m-%d %H:%M UTC");
        assert!(settings.default_profile.is_none());
    }
}
