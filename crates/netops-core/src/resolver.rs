//! Layered configuration resolution.
//!
//! Merges, lowest to highest precedence:
//! 1. Built-in per-field defaults from the schema
//! 2. The skill's entry in the defaults registry
//! 3. A named profile (optional)
//! 4. Explicit caller input (file- or flag-sourced)
//!
//! A later layer overwrites fields set by an earlier one; fields a layer does
//! not mention keep their prior value. Every layer is checked against the
//! schema: setting an unknown field is a [`ConfigError::UnknownField`].
//!
//! After resolution, [`derive`] fills still-unset fields from lookup tables.

use netops_types::error::ConfigError;
use netops_types::profile::Profile;
use netops_types::record::InputRecord;
use netops_types::schema::{FieldType, Schema};
use netops_types::skill::Derivation;
use netops_types::value::{FieldValues, Value};

/// Resolve the candidate record for one invocation.
///
/// Pure and deterministic: identical inputs always yield an identical record.
pub fn resolve(
    schema: &Schema,
    defaults: &FieldValues,
    profile: Option<&Profile>,
    explicit: &FieldValues,
) -> Result<InputRecord, ConfigError> {
    let mut record = InputRecord::new();

    for field in schema.fields() {
        if let Some(ref default) = field.default {
            record.insert(field.name.clone(), coerce(field.field_type, default.clone()));
        }
    }

    apply_layer(&mut record, schema, "defaults registry", defaults)?;

    if let Some(profile) = profile {
        apply_layer(
            &mut record,
            schema,
            &format!("profile '{}'", profile.name),
            &profile.values,
        )?;
    }

    apply_layer(&mut record, schema, "explicit input", explicit)?;

    tracing::debug!(fields = record.len(), "resolved candidate record");
    Ok(record)
}

fn apply_layer(
    record: &mut InputRecord,
    schema: &Schema,
    layer: &str,
    values: &FieldValues,
) -> Result<(), ConfigError> {
    for (name, value) in values {
        let spec = schema.get(name).ok_or_else(|| ConfigError::UnknownField {
            layer: layer.to_string(),
            field: name.clone(),
        })?;
        let previous = record.insert(name.clone(), coerce(spec.field_type, value.clone()));
        tracing::trace!(layer, field = %name, overridden = previous.is_some(), "applied value");
    }
    Ok(())
}

/// Coerce a value to `field_type` where the conversion is unambiguous.
///
/// Values that cannot be converted are returned unchanged so the validator
/// can report the mismatch.
pub fn coerce(field_type: FieldType, value: Value) -> Value {
    match (field_type, value) {
        (FieldType::Boolean, Value::Text(s)) => match parse_bool(&s) {
            Some(b) => Value::Bool(b),
            None => Value::Text(s),
        },
        (FieldType::Boolean, Value::Number(n)) if n == 0.0 || n == 1.0 => Value::Bool(n == 1.0),
        (FieldType::Number, Value::Text(s)) => match s.trim().parse::<f64>() {
            Ok(n) if n.is_finite() => Value::Number(n),
            _ => Value::Text(s),
        },
        (FieldType::String, Value::Number(n)) => Value::Text(Value::Number(n).to_string()),
        (FieldType::String, Value::Bool(b)) => Value::Text(b.to_string()),
        (FieldType::List, Value::Text(s)) => {
            if s.is_empty() {
                Value::List(Vec::new())
            } else {
                Value::List(vec![s])
            }
        }
        (_, value) => value,
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

/// A strict derivation whose key had no table entry.
#[derive(Debug, Clone, PartialEq)]
pub struct LookupMiss {
    pub field: String,
    pub key: String,
}

impl From<LookupMiss> for ConfigError {
    fn from(miss: LookupMiss) -> Self {
        ConfigError::NoLookupEntry {
            field: miss.field,
            key: miss.key,
        }
    }
}

/// Fill unset fields from lookup tables, in declaration order.
///
/// A derivation is skipped when its target is already set or when any key
/// field is unset. A key without a table entry falls back to the rule's
/// fallback; with no fallback the field stays unset, and a strict rule also
/// reports the miss. Misses are returned, not raised; they only become
/// [`ConfigError::NoLookupEntry`] for a record that passes validation.
pub fn derive(record: &mut InputRecord, derivations: &[Derivation]) -> Vec<LookupMiss> {
    let mut misses = Vec::new();
    for rule in derivations {
        if record.contains(&rule.field) {
            continue;
        }

        let Some(key) = lookup_key(record, &rule.from) else {
            tracing::debug!(field = %rule.field, "derivation skipped: key field unset");
            continue;
        };

        let value = match rule.table.get(&key) {
            Some(value) => value.clone(),
            None => match rule.fallback {
                Some(ref fallback) => fallback.clone(),
                None => {
                    if rule.strict {
                        tracing::debug!(field = %rule.field, %key, "no lookup entry");
                        misses.push(LookupMiss {
                            field: rule.field.clone(),
                            key,
                        });
                    }
                    continue;
                }
            },
        };

        tracing::trace!(field = %rule.field, %key, "derived value");
        record.insert(rule.field.clone(), value);
    }
    misses
}

fn lookup_key(record: &InputRecord, from: &[String]) -> Option<String> {
    let parts = from
        .iter()
        .map(|name| record.get(name).map(ToString::to_string))
        .collect::<Option<Vec<_>>>()?;
    Some(parts.join("."))
}
