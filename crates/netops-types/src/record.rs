//! The per-invocation record of field values.

use serde::Serialize;

use crate::value::{FieldValues, Value};

/// Field values for one invocation.
///
/// Built by the resolver, checked by the validator, read by the renderer.
/// Iteration is ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct InputRecord {
    values: FieldValues,
}

impl InputRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Set a field, returning the value it replaced.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(name.into(), value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &FieldValues {
        &self.values
    }
}

impl From<FieldValues> for InputRecord {
    fn from(values: FieldValues) -> Self {
        Self { values }
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for InputRecord {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_replaces_and_reports_previous() {
        let mut record = InputRecord::new();
        assert!(record.insert("severity", Value::from("P2")).is_none());
        let previous = record.insert("severity", Value::from("P1"));
        assert_eq!(previous, Some(Value::from("P2")));
        assert_eq!(record.get("severity"), Some(&Value::from("P1")));
        assert_eq!(record.len(), 1);
    }

    #[test]
    fn test_iteration_is_sorted_by_name() {
        let record: InputRecord = [("zeta", Value::from(1.0)), ("alpha", Value::from(2.0))]
            .into_iter()
            .collect();
        let names: Vec<_> = record.iter().map(|(k, _)| k).collect();
        assert_eq!(names, vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_serializes_as_plain_mapping() {
        let record: InputRecord = [("checks_done", Value::List(vec![]))].into_iter().collect();
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"checks_done":[]}"#);
    }
}
