//! `netops validate`: resolve and check input without rendering.

use anyhow::{Context, Result};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use serde_json::json;

use netops_core::skill::SkillRunner;
use netops_infra::LoadedConfig;

use super::InputArgs;
use super::input::build_explicit;
use super::listing::display_value;
use super::run::select_profile;

/// Print the resolved record, or fail with every violation.
pub fn validate_input(config: &LoadedConfig, skill_name: &str, input: &InputArgs, json: bool) -> Result<()> {
    let profile = select_profile(config, skill_name, input.profile.as_deref())?;
    let explicit = build_explicit(input, &[])?;
    let record = SkillRunner::new(&config.registry)
        .prepare(skill_name, &explicit, profile.as_deref())
        .with_context(|| format!("Input for skill '{skill_name}' is not valid"))?;

    if json {
        let body = json!({
            "skill": skill_name,
            "profile": profile,
            "valid": true,
            "record": record.record(),
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        Cell::new("Field").fg(Color::White),
        Cell::new("Value").fg(Color::White),
    ]);
    for (field, value) in record.record().iter() {
        table.add_row(vec![Cell::new(field).fg(Color::Cyan), Cell::new(display_value(value))]);
    }

    println!();
    println!("{table}");
    println!();
    println!(
        "  {} Input for {} is valid{}",
        style("✓").green().bold(),
        style(skill_name).cyan(),
        profile
            .map(|p| format!(" (profile {})", style(p).bold()))
            .unwrap_or_default()
    );
    println!();
    Ok(())
}
