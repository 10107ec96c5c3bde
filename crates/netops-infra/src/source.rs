//! Where configuration files come from.
//!
//! The built-in skills are compiled into the binary with `include_str!()`, so
//! `netops` works with no files on disk. A config directory with the same
//! layout replaces them entirely:
//!
//! ```text
//! defaults.yaml
//! profiles.yaml
//! settings.toml          (optional)
//! skills/<skill>.yaml
//! templates/*.md
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use netops_types::error::ConfigError;

/// Built-in assets, keyed by their path relative to the config root.
mod embedded {
    pub const FILES: &[(&str, &str)] = &[
        ("defaults.yaml", include_str!("../assets/defaults.yaml")),
        ("profiles.yaml", include_str!("../assets/profiles.yaml")),
        ("settings.toml", include_str!("../assets/settings.toml")),
        ("skills/fcr.yaml", include_str!("../assets/skills/fcr.yaml")),
        ("skills/incident.yaml", include_str!("../assets/skills/incident.yaml")),
        ("skills/runbook.yaml", include_str!("../assets/skills/runbook.yaml")),
        ("templates/fcr.md", include_str!("../assets/templates/fcr.md")),
        (
            "templates/incident_client.md",
            include_str!("../assets/templates/incident_client.md"),
        ),
        (
            "templates/incident_manager.md",
            include_str!("../assets/templates/incident_manager.md"),
        ),
        ("templates/runbook.md", include_str!("../assets/templates/runbook.md")),
    ];
}

/// Root of the configuration layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Assets compiled into the binary.
    Embedded,
    /// A directory on disk.
    Directory(PathBuf),
}

impl ConfigSource {
    /// Read a required file.
    pub fn read(&self, relative: &str) -> Result<String, ConfigError> {
        match self {
            Self::Embedded => embedded::FILES
                .iter()
                .find(|(name, _)| *name == relative)
                .map(|(_, content)| (*content).to_string())
                .ok_or_else(|| ConfigError::MissingFile(PathBuf::from(relative))),
            Self::Directory(root) => read_file(&root.join(relative)),
        }
    }

    /// Read a file that may legitimately be absent.
    pub fn read_optional(&self, relative: &str) -> Result<Option<String>, ConfigError> {
        match self.read(relative) {
            Ok(content) => Ok(Some(content)),
            Err(ConfigError::MissingFile(_)) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Relative paths of every skill definition, sorted.
    pub fn skill_files(&self) -> Result<Vec<String>, ConfigError> {
        let mut files: Vec<String> = match self {
            Self::Embedded => embedded::FILES
                .iter()
                .map(|(name, _)| *name)
                .filter(|name| name.starts_with("skills/"))
                .map(str::to_string)
                .collect(),
            Self::Directory(root) => {
                let dir = root.join("skills");
                let entries = std::fs::read_dir(&dir).map_err(|err| io_error(&dir, &err))?;
                let mut files = Vec::new();
                for entry in entries {
                    let path = entry.map_err(|err| io_error(&dir, &err))?.path();
                    let is_yaml = path
                        .extension()
                        .and_then(|ext| ext.to_str())
                        .is_some_and(|ext| ext == "yaml" || ext == "yml");
                    if let (true, Some(name)) = (is_yaml, path.file_name().and_then(|n| n.to_str())) {
                        files.push(format!("skills/{name}"));
                    }
                }
                files
            }
        };
        files.sort();
        Ok(files)
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Embedded => f.write_str("built-in assets"),
            Self::Directory(root) => write!(f, "{}", root.display()),
        }
    }
}

/// Read a UTF-8 file, mapping "not found" to [`ConfigError::MissingFile`].
pub fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|err| io_error(path, &err))
}

fn io_error(path: &Path, err: &std::io::Error) -> ConfigError {
    if err.kind() == std::io::ErrorKind::NotFound {
        ConfigError::MissingFile(path.to_path_buf())
    } else {
        ConfigError::Read {
            path: path.to_path_buf(),
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_embedded_assets_are_complete() {
        let source = ConfigSource::Embedded;
        assert_eq!(
            source.skill_files().unwrap(),
            vec!["skills/fcr.yaml", "skills/incident.yaml", "skills/runbook.yaml"]
        );
        assert!(source.read("templates/incident_manager.md").is_ok());
        assert!(matches!(
            source.read("templates/missing.md"),
            Err(ConfigError::MissingFile(_))
        ));
    }

    #[test]
    fn test_directory_source_reads_and_lists() {
        let dir = tempdir().unwrap();
        std::fs::create_dir(dir.path().join("skills")).unwrap();
        std::fs::write(dir.path().join("skills/b.yaml"), "b").unwrap();
        std::fs::write(dir.path().join("skills/a.yml"), "a").unwrap();
        std::fs::write(dir.path().join("skills/notes.txt"), "ignored").unwrap();

        let source = ConfigSource::Directory(dir.path().to_path_buf());
        assert_eq!(source.skill_files().unwrap(), vec!["skills/a.yml", "skills/b.yaml"]);
        assert_eq!(source.read("skills/b.yaml").unwrap(), "b");
        assert_eq!(source.read_optional("settings.toml").unwrap(), None);
    }

    #[test]
    fn test_directory_without_skills_is_missing_file() {
        let dir = tempdir().unwrap();
        let source = ConfigSource::Directory(dir.path().to_path_buf());
        assert!(matches!(source.skill_files(), Err(ConfigError::MissingFile(_))));
    }
}
