//! Interactive prompting for fields the caller left unset.
//!
//! Answers go into the explicit layer, so they pass through exactly the same
//! resolution and validation as flag or file input.

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Input, Select};

use netops_core::resolver;
use netops_core::skill::Skill;
use netops_types::profile::Profile;
use netops_types::schema::FieldType;
use netops_types::skill::Derivation;
use netops_types::value::{FieldValues, Value};

use super::input::TIMESTAMP_FIELD;

/// One question to ask.
#[derive(Debug, Clone, PartialEq)]
pub enum Prompt {
    /// Pick one of the allowed values; `default` indexes `options`.
    Choose {
        field: String,
        label: String,
        options: Vec<String>,
        default: usize,
    },
    /// Pick the last part of a lookup-table key. Options are the keys whose
    /// leading parts match `prefix_fields`, worked out once those are answered.
    Lookup {
        field: String,
        label: String,
        prefix_fields: Vec<String>,
        keys: Vec<String>,
        known: FieldValues,
    },
    /// Free text for a required field.
    Text { field: String, label: String },
    /// Collect list items until an empty answer.
    List { field: String, label: String },
}

/// Work out which prompts to show, given what is already known.
pub fn plan(
    skill: &Skill,
    defaults: &FieldValues,
    profile: Option<&Profile>,
    explicit: &FieldValues,
    detailed: bool,
) -> Result<Vec<Prompt>> {
    let candidate = resolver::resolve(skill.schema(), defaults, profile, explicit)
        .context("Failed to resolve current values")?;
    let derived: Vec<&str> = skill
        .definition()
        .derive
        .iter()
        .map(|d| d.field.as_str())
        .collect();

    let mut prompts = Vec::new();
    for spec in skill.schema().fields() {
        let name = spec.name.as_str();
        if explicit.contains_key(name) || derived.contains(&name) || name == TIMESTAMP_FIELD {
            continue;
        }

        let field = spec.name.clone();
        let label = spec.label().to_string();
        if let Some(ref allowed) = spec.allowed {
            if spec.field_type == FieldType::List {
                continue;
            }
            let current = candidate.get(name).map(Value::to_string);
            let default = current
                .and_then(|c| allowed.iter().position(|a| *a == c))
                .unwrap_or(0);
            prompts.push(Prompt::Choose {
                field,
                label,
                options: allowed.clone(),
                default,
            });
        } else if let Some(rule) = keyed_by(skill, name).filter(|_| spec.required) {
            let prefix_fields = rule.from[..rule.from.len() - 1].to_vec();
            let known = prefix_fields
                .iter()
                .filter_map(|f| candidate.get(f).map(|v| (f.clone(), v.clone())))
                .collect();
            prompts.push(Prompt::Lookup {
                field,
                label,
                prefix_fields,
                keys: rule.table.keys().cloned().collect(),
                known,
            });
        } else if spec.field_type == FieldType::List {
            if detailed {
                prompts.push(Prompt::List { field, label });
            }
        } else if spec.required {
            prompts.push(Prompt::Text { field, label });
        }
    }
    Ok(prompts)
}

/// The first strict derivation whose key ends with `field`.
fn keyed_by<'a>(skill: &'a Skill, field: &str) -> Option<&'a Derivation> {
    skill
        .definition()
        .derive
        .iter()
        .find(|rule| rule.strict && rule.from.last().is_some_and(|last| last == field))
}

/// Choices for a [`Prompt::Lookup`]: the remaining key part of every table
/// key whose leading parts equal the current values of `prefix_fields`.
/// Answers given so far win over the resolved values in `known`.
pub fn lookup_options(
    keys: &[String],
    prefix_fields: &[String],
    answered: &FieldValues,
    known: &FieldValues,
) -> Vec<String> {
    let mut prefix = String::new();
    for field in prefix_fields {
        let Some(value) = answered.get(field).or_else(|| known.get(field)) else {
            return Vec::new();
        };
        prefix.push_str(&value.to_string());
        prefix.push('.');
    }
    keys.iter()
        .filter_map(|key| key.strip_prefix(prefix.as_str()))
        .filter(|rest| !rest.is_empty() && !rest.contains('.'))
        .map(str::to_string)
        .collect()
}

/// Ask every planned question and record the answers in `explicit`.
pub fn ask(prompts: &[Prompt], explicit: &mut FieldValues) -> Result<()> {
    if prompts.is_empty() {
        return Ok(());
    }
    eprintln!();
    eprintln!("  {} Fill in the details (Enter accepts the default)", style("?").cyan().bold());
    eprintln!();

    for prompt in prompts {
        match prompt {
            Prompt::Choose {
                field,
                label,
                options,
                default,
            } => {
                let selection = Select::new()
                    .with_prompt(label.as_str())
                    .items(options)
                    .default(*default)
                    .interact()?;
                explicit.insert(field.clone(), Value::from(options[selection].as_str()));
            }
            Prompt::Lookup {
                field,
                label,
                prefix_fields,
                keys,
                known,
            } => {
                let options = lookup_options(keys, prefix_fields, explicit, known);
                let answer: String = if options.is_empty() {
                    Input::new().with_prompt(label.as_str()).interact_text()?
                } else {
                    let selection = Select::new()
                        .with_prompt(label.as_str())
                        .items(&options)
                        .default(0)
                        .interact()?;
                    options[selection].clone()
                };
                explicit.insert(field.clone(), Value::Text(answer));
            }
            Prompt::Text { field, label } => {
                let answer: String = Input::new().with_prompt(label.as_str()).interact_text()?;
                explicit.insert(field.clone(), Value::Text(answer));
            }
            Prompt::List { field, label } => {
                eprintln!("  {} {} (empty line to finish)", style("•").dim(), label);
                let mut items = Vec::new();
                loop {
                    let item: String = Input::new()
                        .with_prompt(format!("  {}", items.len() + 1))
                        .allow_empty(true)
                        .interact_text()?;
                    if item.trim().is_empty() {
                        break;
                    }
                    items.push(item);
                }
                if !items.is_empty() {
                    explicit.insert(field.clone(), Value::List(items));
                }
            }
        }
    }
    Ok(())
}
