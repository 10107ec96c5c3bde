//! Config directory and user file locations.

use std::path::PathBuf;

use crate::source::ConfigSource;

/// Environment variable naming a config directory.
pub const CONFIG_DIR_ENV: &str = "NETOPS_CONFIG_DIR";

/// Resolve where configuration is read from.
///
/// Priority:
/// 1. An explicit directory (the `--config-dir` flag)
/// 2. `NETOPS_CONFIG_DIR` environment variable
/// 3. The embedded assets
pub fn resolve_config_source(explicit: Option<PathBuf>) -> ConfigSource {
    if let Some(dir) = explicit {
        return ConfigSource::Directory(dir);
    }

    match std::env::var(CONFIG_DIR_ENV) {
        Ok(dir) if !dir.trim().is_empty() => ConfigSource::Directory(PathBuf::from(dir)),
        _ => ConfigSource::Embedded,
    }
}

/// Per-user profiles file, e.g. `~/.config/netops/profiles.yaml` on Linux.
pub fn user_profiles_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("netops").join("profiles.yaml"))
}
