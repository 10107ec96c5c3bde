//! Read-only listing commands: skills, show, profiles.

use anyhow::Result;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use serde_json::json;

use netops_core::skill::SkillRegistry;
use netops_types::value::Value;

fn new_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(headers.iter().map(|h| Cell::new(h).fg(Color::White)).collect::<Vec<_>>());
    table
}

/// List registered skills.
pub fn list_skills(registry: &SkillRegistry, json: bool) -> Result<()> {
    if json {
        let skills: Vec<_> = registry
            .skills()
            .map(|s| {
                json!({
                    "name": s.name(),
                    "description": s.description(),
                    "variants": s.variants().collect::<Vec<_>>(),
                    "required": s.schema().required_fields().map(|f| f.name.as_str()).collect::<Vec<_>>(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&skills)?);
        return Ok(());
    }

    let mut table = new_table(&["Skill", "Description", "Required", "Variants"]);
    for skill in registry.skills() {
        let required: Vec<&str> = skill.schema().required_fields().map(|f| f.name.as_str()).collect();
        table.add_row(vec![
            Cell::new(skill.name()).fg(Color::Cyan),
            Cell::new(skill.description()),
            Cell::new(required.join(", ")),
            Cell::new(skill.variants().collect::<Vec<_>>().join(", ")).fg(Color::DarkGrey),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  Run one with: {}",
        style("netops run <skill> --set field=value").yellow()
    );
    println!();
    Ok(())
}

/// Show the fields of one skill.
pub fn show_skill(registry: &SkillRegistry, name: &str, json: bool) -> Result<()> {
    let skill = registry.skill(name)?;
    let defaults = registry.defaults(name);
    let derived: Vec<&str> = skill.definition().derive.iter().map(|d| d.field.as_str()).collect();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&json!({
                "definition": skill.definition(),
                "defaults": defaults,
            }))?
        );
        return Ok(());
    }

    println!();
    println!("  {} {}", style(skill.name()).cyan().bold(), style(skill.description()).dim());
    println!();

    let mut table = new_table(&["Field", "Type", "Required", "Default", "Allowed"]);
    for spec in skill.schema().fields() {
        let default = defaults
            .and_then(|d| d.get(&spec.name))
            .or(spec.default.as_ref())
            .map(display_value)
            .unwrap_or_else(|| {
                if derived.contains(&spec.name.as_str()) {
                    "(derived)".to_string()
                } else {
                    String::new()
                }
            });
        let required = if spec.required {
            Cell::new("yes").fg(Color::Yellow)
        } else {
            Cell::new("")
        };
        table.add_row(vec![
            Cell::new(&spec.name),
            Cell::new(spec.field_type.to_string()).fg(Color::DarkGrey),
            required,
            Cell::new(default),
            Cell::new(spec.allowed.as_ref().map(|a| a.join(", ")).unwrap_or_default()),
        ]);
    }
    println!("{table}");
    println!();
    println!(
        "  {}  {}",
        style("Variants:").bold(),
        skill.variants().collect::<Vec<_>>().join(", ")
    );
    if let Some(ref field) = skill.definition().variant_field {
        println!(
            "  {}  chosen by '{}', falling back to '{}'",
            style("Selection:").bold(),
            field,
            skill.definition().fallback_variant()
        );
    }
    println!();
    Ok(())
}

/// List available profiles.
pub fn list_profiles(registry: &SkillRegistry, json: bool) -> Result<()> {
    if json {
        let profiles: Vec<_> = registry
            .profiles()
            .map(|p| {
                json!({
                    "name": p.name,
                    "description": p.description,
                    "skill": p.skill,
                    "values": p.values,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&profiles)?);
        return Ok(());
    }

    if registry.profiles().next().is_none() {
        println!();
        println!("  {} No profiles defined.", style("i").blue().bold());
        println!();
        return Ok(());
    }

    let mut table = new_table(&["Profile", "Skill", "Description", "Sets"]);
    for profile in registry.profiles() {
        let sets: Vec<String> = profile
            .values
            .iter()
            .map(|(k, v)| format!("{k}={}", display_value(v)))
            .collect();
        table.add_row(vec![
            Cell::new(&profile.name).fg(Color::Cyan),
            Cell::new(profile.skill.as_deref().unwrap_or("any")),
            Cell::new(profile.description.as_deref().unwrap_or("")),
            Cell::new(sets.join(", ")),
        ]);
    }

    println!();
    println!("{table}");
    println!();
    Ok(())
}

/// Compact single-line rendering for table cells.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::List(items) if items.is_empty() => "[]".to_string(),
        Value::List(items) => format!("[{}]", items.join(", ")),
        other => other.to_string(),
    }
}
