//! Schema validation of candidate records.
//!
//! Collects every violation instead of stopping at the first, so callers can
//! fix their input in one pass. Only a record with zero violations becomes a
//! [`ValidatedRecord`].

use netops_types::error::{Rule, ValidationError, Violation};
use netops_types::record::InputRecord;
use netops_types::schema::{FieldSpec, Schema};
use netops_types::value::Value;

/// A record that passed validation. Read-only from here on.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedRecord(InputRecord);

impl ValidatedRecord {
    pub fn record(&self) -> &InputRecord {
        &self.0
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn into_inner(self) -> InputRecord {
        self.0
    }
}

impl AsRef<InputRecord> for ValidatedRecord {
    fn as_ref(&self) -> &InputRecord {
        &self.0
    }
}

/// Check `record` against `schema`, reporting violations in schema order.
pub fn validate(record: InputRecord, schema: &Schema) -> Result<ValidatedRecord, ValidationError> {
    let violations: Vec<Violation> = schema
        .fields()
        .iter()
        .filter_map(|spec| check_field(spec, record.get(&spec.name)))
        .collect();

    if violations.is_empty() {
        Ok(ValidatedRecord(record))
    } else {
        tracing::debug!(count = violations.len(), "record failed validation");
        Err(ValidationError { violations })
    }
}

fn check_field(spec: &FieldSpec, value: Option<&Value>) -> Option<Violation> {
    let violation = |rule| {
        Some(Violation {
            field: spec.name.clone(),
            rule,
        })
    };

    let Some(value) = value else {
        return if spec.required { violation(Rule::Missing) } else { None };
    };

    if !spec.field_type.accepts(value) {
        return violation(Rule::TypeMismatch {
            expected: spec.field_type,
            found: value.kind().to_string(),
        });
    }

    if spec.required && is_empty(value) {
        return violation(Rule::Missing);
    }

    if let Some(ref allowed) = spec.allowed {
        let rejected = match value {
            Value::List(items) => items.iter().find(|item| !allowed.contains(item)).cloned(),
            other => {
                let text = other.to_string();
                (!allowed.contains(&text)).then_some(text)
            }
        };
        if let Some(value) = rejected {
            return violation(Rule::NotAllowed {
                value,
                allowed: allowed.clone(),
            });
        }
    }

    None
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Text(_) => value.is_blank(),
        Value::List(items) => items.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}
