//! Caller input files.
//!
//! An input file is a flat YAML mapping from field name to a scalar or a list
//! of scalars. List elements are kept as text. JSON is accepted too, since it
//! parses as YAML. Null values are dropped so `field: ~` means "not provided".

use std::path::Path;

use netops_types::error::ConfigError;
use netops_types::skill::SkillDefaults;
use netops_types::value::FieldValues;

use crate::source::read_file;

/// Read and parse the input file at `path`.
pub fn load_input_file(path: &Path) -> Result<FieldValues, ConfigError> {
    let content = read_file(path)?;
    let values = parse_input(&content, &path.display().to_string())?;
    tracing::debug!(path = %path.display(), fields = values.len(), "loaded input file");
    Ok(values)
}

/// Parse input text. `source_name` labels parse errors.
pub fn parse_input(content: &str, source_name: &str) -> Result<FieldValues, ConfigError> {
    serde_yaml_ng::from_str::<SkillDefaults>(content)
        .map(|layer| layer.0)
        .map_err(|err| ConfigError::Parse {
            source_name: source_name.to_string(),
            message: err.to_string(),
        })
}
