//! Error types for configuration loading, validation, templating and skill runs.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::schema::FieldType;

/// Errors raised while loading configuration or resolving layers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("failed to read {}: {message}", .path.display())]
    Read { path: PathBuf, message: String },

    #[error("failed to parse {source_name}: {message}")]
    Parse { source_name: String, message: String },

    #[error("unknown skill '{0}'")]
    UnknownSkill(String),

    #[error("profile '{0}' not found")]
    ProfileNotFound(String),

    #[error("profile '{profile}' is scoped to skill '{scoped_to}', not '{skill}'")]
    ProfileSkillMismatch {
        profile: String,
        scoped_to: String,
        skill: String,
    },

    #[error("{layer} sets field '{field}', which the schema does not define")]
    UnknownField { layer: String, field: String },

    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    #[error("invalid skill definition '{skill}': {reason}")]
    InvalidSkill { skill: String, reason: String },

    #[error("no lookup entry for key '{key}' while deriving '{field}'")]
    NoLookupEntry { field: String, key: String },

    #[error("template '{variant}' of skill '{skill}' failed to compile: {source}")]
    Template {
        skill: String,
        variant: String,
        #[source]
        source: TemplateError,
    },
}

/// The rule a field failed during validation.
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// A required field is absent, blank, or an empty list.
    Missing,
    /// The value's kind does not match the declared field type.
    TypeMismatch { expected: FieldType, found: String },
    /// The value is outside the allowed-values set.
    NotAllowed { value: String, allowed: Vec<String> },
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => f.write_str("required field is missing"),
            Self::TypeMismatch { expected, found } => {
                write!(f, "expected {expected}, got {found}")
            }
            Self::NotAllowed { value, allowed } => {
                write!(f, "'{value}' is not one of [{}]", allowed.join(", "))
            }
        }
    }
}

/// One schema violation: the offending field and the rule it failed.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    pub field: String,
    pub rule: Rule,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.rule)
    }
}

/// Every violation found in a candidate record, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Names of the offending fields, in report order.
    pub fn fields(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.violations.len() == 1 { "violation" } else { "violations" };
        write!(f, "{} validation {noun}", self.violations.len())?;
        for (i, violation) in self.violations.iter().enumerate() {
            let sep = if i == 0 { ": " } else { "; " };
            write!(f, "{sep}{violation}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Errors raised while compiling or rendering a template. Lines are 1-based.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TemplateError {
    #[error("line {line}: unterminated {construct}")]
    Unterminated { construct: String, line: usize },

    #[error("line {line}: unexpected '{tag}'")]
    UnexpectedTag { tag: String, line: usize },

    #[error("line {line}: '{block}' block is never closed")]
    Unclosed { block: String, line: usize },

    #[error("line {line}: {message}")]
    Syntax { message: String, line: usize },

    #[error("line {line}: unknown filter '{name}'")]
    UnknownFilter { name: String, line: usize },

    #[error("line {line}: filter '{name}' takes {expected} argument(s), got {found}")]
    FilterArity {
        name: String,
        expected: usize,
        found: usize,
        line: usize,
    },

    #[error("line {line}: '{name}' is not defined and has no default")]
    UnresolvedVariable { name: String, line: usize },

    #[error("line {line}: '{name}' is not a list")]
    NotASequence { name: String, line: usize },
}

/// Any failure of a single skill invocation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SkillError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Template(#[from] TemplateError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display_lists_every_violation() {
        let err = ValidationError {
            violations: vec![
                Violation {
                    field: "incident_title".to_string(),
                    rule: Rule::Missing,
                },
                Violation {
                    field: "severity".to_string(),
                    rule: Rule::NotAllowed {
                        value: "P9".to_string(),
                        allowed: vec!["P1".to_string(), "P2".to_string()],
                    },
                },
            ],
        };
        assert_eq!(
            err.to_string(),
            "2 validation violations: incident_title: required field is missing; \
             severity: 'P9' is not one of [P1, P2]"
        );
        assert_eq!(err.fields(), vec!["incident_title", "severity"]);
    }

    #[test]
    fn test_type_mismatch_display() {
        let rule = Rule::TypeMismatch {
            expected: FieldType::Boolean,
            found: "list".to_string(),
        };
        assert_eq!(rule.to_string(), "expected boolean, got list");
    }

    #[test]
    fn test_template_error_names_line() {
        let err = TemplateError::UnknownFilter {
            name: "shout".to_string(),
            line: 4,
        };
        assert_eq!(err.to_string(), "line 4: unknown filter 'shout'");
    }

    #[test]
    fn test_skill_error_is_transparent() {
        let err: SkillError = ConfigError::ProfileNotFound("night-shift".to_string()).into();
        assert_eq!(err.to_string(), "profile 'night-shift' not found");
    }

    #[test]
    fn test_missing_file_display() {
        let err = ConfigError::MissingFile(PathBuf::from("/tmp/in.yaml"));
        assert_eq!(err.to_string(), "file not found: /tmp/in.yaml");
    }
}
