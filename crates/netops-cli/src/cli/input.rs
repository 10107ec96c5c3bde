//! Assembles the explicit input layer from files and flags.
//!
//! Precedence inside the layer, lowest first: input file, shortcut flags,
//! `--set`, `--add`.

use std::fmt::Write as _;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};

use netops_infra::input::load_input_file;
use netops_types::schema::Schema;
use netops_types::value::{FieldValues, Value};

use super::InputArgs;

/// Field the CLI stamps with the generation time.
pub const TIMESTAMP_FIELD: &str = "generated_at";

/// Split `field=value`. The value may itself contain `=`.
pub fn parse_assignment(raw: &str) -> Result<(String, String)> {
    let Some((field, value)) = raw.split_once('=') else {
        bail!("expected FIELD=VALUE, got '{raw}'");
    };
    let field = field.trim();
    if field.is_empty() {
        bail!("missing field name in '{raw}'");
    }
    Ok((field.to_string(), value.to_string()))
}

/// Build the explicit layer. `shortcuts` are field values bound from a
/// shortcut command's positionals and options.
pub fn build_explicit(args: &InputArgs, shortcuts: &[(&str, Option<String>)]) -> Result<FieldValues> {
    let mut values = match args.input {
        Some(ref path) => load_input_file(path)
            .with_context(|| format!("Failed to load input file {}", path.display()))?,
        None => FieldValues::new(),
    };

    for (field, value) in shortcuts {
        if let Some(value) = value {
            values.insert((*field).to_string(), Value::from(value.as_str()));
        }
    }

    for raw in &args.set {
        let (field, value) = parse_assignment(raw)?;
        values.insert(field, Value::Text(value));
    }

    for raw in &args.add {
        let (field, value) = parse_assignment(raw)?;
        append(&mut values, field, value);
    }

    Ok(values)
}

fn append(values: &mut FieldValues, field: String, item: String) {
    let merged = match values.remove(&field) {
        None => vec![item],
        Some(Value::List(mut items)) => {
            items.push(item);
            items
        }
        Some(Value::Text(text)) if text.trim().is_empty() => vec![item],
        Some(other) => vec![other.to_string(), item],
    };
    values.insert(field, Value::List(merged));
}

/// Stamp `generated_at` when the skill declares it and the caller did not
/// set it.
pub fn inject_timestamp(
    values: &mut FieldValues,
    schema: &Schema,
    format: &str,
    now: DateTime<Utc>,
) -> Result<()> {
    if !schema.contains(TIMESTAMP_FIELD) || values.contains_key(TIMESTAMP_FIELD) {
        return Ok(());
    }
    let mut stamp = String::new();
    write!(stamp, "{}", now.format(format))
        .map_err(|_| anyhow::anyhow!("invalid timestamp_format '{format}'"))?;
    values.insert(TIMESTAMP_FIELD.to_string(), Value::Text(stamp));
    Ok(())
}
