//! Document delivery and error reporting.

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use serde_json::json;

use netops_core::skill::Rendered;
use netops_types::error::{ConfigError, SkillError, TemplateError, ValidationError};

/// Write a rendered document to `output` or stdout.
pub fn deliver(
    skill: &str,
    rendered: &Rendered,
    output: Option<&Path>,
    json: bool,
    quiet: bool,
) -> Result<()> {
    if let Some(path) = output {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        std::fs::write(path, &rendered.document)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), "document written");

        if json {
            let summary = json!({
                "skill": skill,
                "variant": rendered.variant,
                "output": path.display().to_string(),
            });
            println!("{}", serde_json::to_string_pretty(&summary)?);
        } else if !quiet {
            eprintln!(
                "  {} Wrote {} document to {}",
                style("✓").green().bold(),
                style(skill).cyan(),
                style(path.display()).dim()
            );
        }
        return Ok(());
    }

    if json {
        let doc = json!({
            "skill": skill,
            "variant": rendered.variant,
            "document": rendered.document,
        });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        print!("{}", rendered.document);
        if !rendered.document.ends_with('\n') {
            println!();
        }
    }
    Ok(())
}

/// Print a failed command's error to stderr, or as JSON on stdout.
///
/// Validation failures list every violation, one per line.
pub fn report_error(err: &anyhow::Error, json: bool) {
    let validation = find_validation(err);

    if json {
        let body = match validation {
            Some(v) => json!({
                "error": {
                    "kind": "validation",
                    "message": v.to_string(),
                    "violations": v.violations.iter().map(|violation| json!({
                        "field": violation.field,
                        "rule": violation.rule.to_string(),
                    })).collect::<Vec<_>>(),
                }
            }),
            None => json!({
                "error": {
                    "kind": error_kind(err),
                    "message": format!("{err:#}"),
                }
            }),
        };
        match serde_json::to_string_pretty(&body) {
            Ok(text) => println!("{text}"),
            Err(_) => eprintln!("{err:#}"),
        }
        return;
    }

    eprintln!();
    match validation {
        Some(v) => {
            eprintln!(
                "  {} Input is not valid ({} problem{}):",
                style("✗").red().bold(),
                v.violations.len(),
                if v.violations.len() == 1 { "" } else { "s" }
            );
            for violation in &v.violations {
                eprintln!(
                    "    {} {}: {}",
                    style("•").red(),
                    style(&violation.field).bold(),
                    violation.rule
                );
            }
        }
        None => {
            eprintln!("  {} {err:#}", style("✗").red().bold());
        }
    }
    eprintln!();
}

fn find_validation(err: &anyhow::Error) -> Option<&ValidationError> {
    err.chain().find_map(|cause| {
        cause.downcast_ref::<ValidationError>().or_else(|| match cause.downcast_ref::<SkillError>() {
            Some(SkillError::Validation(v)) => Some(v),
            _ => None,
        })
    })
}

fn error_kind(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if let Some(skill_err) = cause.downcast_ref::<SkillError>() {
            return match skill_err {
                SkillError::Config(_) => "config",
                SkillError::Validation(_) => "validation",
                SkillError::Template(_) => "template",
            };
        }
        if cause.is::<ConfigError>() {
            return "config";
        }
        if cause.is::<TemplateError>() {
            return "template";
        }
    }
    "other"
}

#[cfg(test)]
mod tests {
    use netops_types::error::{Rule, Violation};
    use tempfile::tempdir;

    use super::*;

    fn validation_error() -> anyhow::Error {
        SkillError::Validation(ValidationError {
            violations: vec![Violation {
                field: "impact_summary".to_string(),
                rule: Rule::Missing,
            }],
        })
        .into()
    }

    #[test]
    fn test_validation_found_through_context() {
        let err = validation_error().context("Failed to run skill 'incident'");
        let found = find_validation(&err).unwrap();
        assert_eq!(found.fields(), vec!["impact_summary"]);
        assert_eq!(error_kind(&err), "validation");
    }

    #[test]
    fn test_error_kind_for_config_errors() {
        let err: anyhow::Error = ConfigError::UnknownSkill("x".to_string()).into();
        assert_eq!(error_kind(&err), "config");
        assert!(find_validation(&err).is_none());
        assert_eq!(error_kind(&anyhow::anyhow!("boom")), "other");
    }

    #[test]
    fn test_deliver_to_file_creates_parent() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out/update.md");
        let rendered = Rendered {
            variant: "manager".to_string(),
            document: "# hi\n".to_string(),
        };
        deliver("incident", &rendered, Some(&path), false, true).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# hi\n");
    }
}
