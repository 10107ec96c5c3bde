//! The closed set of text filters usable in `{{ value | filter }}`.

use netops_types::error::TemplateError;
use netops_types::value::Value;

/// A filter with its arguments, validated at compile time.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Filter {
    /// Upper-case the first letter of every word, lower-case the rest.
    Title,
    Upper,
    Lower,
    /// Upper-case the first character only.
    Capitalize,
    Trim,
    Replace { from: String, to: String },
    /// Substitute a value when the reference is missing.
    Default(String),
    Join(String),
    /// One `- item` line per element.
    Bullets,
    /// One `N. item` line per element, starting at 1.
    Numbered,
}

impl Filter {
    pub(crate) fn parse(name: &str, args: Vec<String>, line: usize) -> Result<Self, TemplateError> {
        let expected = match name {
            "title" | "upper" | "lower" | "capitalize" | "trim" | "bullets" | "numbered" => 0,
            "default" | "join" => 1,
            "replace" => 2,
            _ => {
                return Err(TemplateError::UnknownFilter {
                    name: name.to_string(),
                    line,
                });
            }
        };

        if args.len() != expected {
            return Err(TemplateError::FilterArity {
                name: name.to_string(),
                expected,
                found: args.len(),
                line,
            });
        }

        let mut args = args.into_iter();
        let mut next = || args.next().unwrap_or_default();
        Ok(match name {
            "title" => Self::Title,
            "upper" => Self::Upper,
            "lower" => Self::Lower,
            "capitalize" => Self::Capitalize,
            "trim" => Self::Trim,
            "bullets" => Self::Bullets,
            "numbered" => Self::Numbered,
            "default" => Self::Default(next()),
            "join" => Self::Join(next()),
            _ => Self::Replace {
                from: next(),
                to: next(),
            },
        })
    }

    /// Apply the filter. `None` is a missing value; only `default` turns it
    /// into something.
    pub(crate) fn apply(&self, value: Option<Value>) -> Option<Value> {
        let Some(value) = value else {
            return match self {
                Self::Default(fallback) => Some(Value::Text(fallback.clone())),
                _ => None,
            };
        };

        Some(match self {
            Self::Default(_) => value,
            Self::Title => map_text(value, title_case),
            Self::Upper => map_text(value, |s| s.to_uppercase()),
            Self::Lower => map_text(value, |s| s.to_lowercase()),
            Self::Capitalize => map_text(value, capitalize),
            Self::Trim => map_text(value, |s| s.trim().to_string()),
            Self::Replace { from, to } => map_text(value, |s| {
                if from.is_empty() {
                    s.to_string()
                } else {
                    s.replace(from.as_str(), to)
                }
            }),
            Self::Join(sep) => Value::Text(items(&value).join(sep)),
            Self::Bullets => Value::Text(
                items(&value)
                    .iter()
                    .map(|item| format!("- {item}"))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
            Self::Numbered => Value::Text(
                items(&value)
                    .iter()
                    .enumerate()
                    .map(|(i, item)| format!("{}. {item}", i + 1))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
        })
    }
}

/// Apply a string transform to a scalar, or to each element of a list.
fn map_text(value: Value, f: impl Fn(&str) -> String) -> Value {
    match value {
        Value::List(items) => Value::List(items.iter().map(|s| f(s)).collect()),
        other => Value::Text(f(&other.to_string())),
    }
}

/// Elements of a list, or a scalar as a one-element list (none if empty).
fn items(value: &Value) -> Vec<String> {
    match value {
        Value::List(items) => items.clone(),
        other => {
            let text = other.to_string();
            if text.is_empty() { Vec::new() } else { vec![text] }
        }
    }
}

fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_word = false;
    for c in s.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Option<Value> {
        Some(Value::from(s))
    }

    #[test]
    fn test_unknown_filter_is_rejected() {
        let err = Filter::parse("shout", vec![], 3).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnknownFilter {
                name: "shout".to_string(),
                line: 3,
            }
        );
    }

    #[test]
    fn test_arity_is_checked() {
        let err = Filter::parse("replace", vec!["a".to_string()], 1).unwrap_err();
        assert!(matches!(err, TemplateError::FilterArity { expected: 2, found: 1, .. }));
        assert!(Filter::parse("upper", vec!["x".to_string()], 1).is_err());
    }

    #[test]
    fn test_case_filters() {
        assert_eq!(Filter::Title.apply(text("firewall RULE change")), text("Firewall Rule Change"));
        assert_eq!(Filter::Upper.apply(text("prod")), text("PROD"));
        assert_eq!(Filter::Lower.apply(text("P1")), text("p1"));
        assert_eq!(Filter::Capitalize.apply(text("investigating BGP")), text("Investigating BGP"));
        assert_eq!(Filter::Capitalize.apply(text("")), text(""));
    }

    #[test]
    fn test_replace_then_title() {
        let replace = Filter::parse("replace", vec!["_".into(), " ".into()], 1).unwrap();
        let value = replace.apply(text("routing_change"));
        assert_eq!(Filter::Title.apply(value), text("Routing Change"));
    }

    #[test]
    fn test_default_only_applies_to_missing() {
        let default = Filter::Default("TBD".to_string());
        assert_eq!(default.apply(None), text("TBD"));
        assert_eq!(default.apply(text("")), text(""));
        assert_eq!(default.apply(text("15:00")), text("15:00"));
    }

    #[test]
    fn test_non_default_filters_propagate_missing() {
        assert_eq!(Filter::Upper.apply(None), None);
        assert_eq!(Filter::Bullets.apply(None), None);
    }

    #[test]
    fn test_text_filters_map_over_lists() {
        let list = Some(Value::from(vec!["a", "b"]));
        assert_eq!(Filter::Upper.apply(list), Some(Value::from(vec!["A", "B"])));
    }

    #[test]
    fn test_list_formatting_filters() {
        let list = Some(Value::from(vec!["ping gateway", "check tunnel"]));
        assert_eq!(
            Filter::Bullets.apply(list.clone()),
            text("- ping gateway\n- check tunnel")
        );
        assert_eq!(
            Filter::Numbered.apply(list.clone()),
            text("1. ping gateway\n2. check tunnel")
        );
        assert_eq!(
            Filter::Join(" / ".to_string()).apply(list),
            text("ping gateway / check tunnel")
        );
        assert_eq!(Filter::Bullets.apply(Some(Value::List(vec![]))), text(""));
    }

    #[test]
    fn test_scalars_become_text() {
        assert_eq!(Filter::Upper.apply(Some(Value::Bool(true))), text("TRUE"));
        assert_eq!(Filter::Trim.apply(Some(Value::Number(4.0))), text("4"));
    }
}
