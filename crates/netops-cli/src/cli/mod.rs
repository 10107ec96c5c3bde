//! CLI command definitions for the `netops` binary.
//!
//! Uses clap derive macros. `run` works for any registered skill; `incident`,
//! `runbook`, and `fcr` are shortcuts that bind positionals and short flags to
//! the built-in skills' fields.

pub mod input;
pub mod interactive;
pub mod listing;
pub mod output;
pub mod run;
pub mod validate;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Generate network operations documents from minimal input.
#[derive(Parser)]
#[command(name = "netops", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except the document and errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed logging (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Emit logs as JSON lines on stderr.
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Read skills, templates, defaults, and profiles from this directory
    /// instead of the built-in assets.
    /// Falls back to `NETOPS_CONFIG_DIR` when not given.
    #[arg(long, global = true, value_name = "DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run any skill.
    Run {
        /// Skill name (see `netops skills`).
        skill: String,

        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Compose an incident update.
    Incident {
        /// Short title describing the incident.
        title: Option<String>,

        /// Brief description of user or business impact.
        impact: Option<String>,

        /// Target audience (manager, client, internal, executive).
        #[arg(short, long)]
        audience: Option<String>,

        /// Severity (P1-P4).
        #[arg(short, long)]
        severity: Option<String>,

        /// Current status (investigating, identified, monitoring, resolved, escalated).
        #[arg(long)]
        status: Option<String>,

        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Generate a safe troubleshooting runbook.
    Runbook {
        /// Network domain (firewall, fmc, f5, circuit).
        domain: Option<String>,

        /// Symptom category, e.g. high_cpu.
        symptom: Option<String>,

        /// Access mode (gui_only, cli_read_only, cli_full).
        #[arg(short = 'm', long)]
        access_mode: Option<String>,

        /// Environment (prod, uat, dev, lab).
        #[arg(short, long)]
        environment: Option<String>,

        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Fill in the sections of a firewall change request.
    Fcr {
        /// Why the change is needed.
        purpose: Option<String>,

        /// Change type (firewall_rule, nat_change, f5_ssl, routing_change, acl_update, vpn_config).
        #[arg(short = 't', long)]
        change_type: Option<String>,

        /// Risk level (low, medium, high).
        #[arg(short, long)]
        risk: Option<String>,

        #[command(flatten)]
        input: InputArgs,

        #[command(flatten)]
        render: RenderArgs,
    },

    /// Resolve and validate input without rendering.
    Validate {
        /// Skill name.
        skill: String,

        #[command(flatten)]
        input: InputArgs,
    },

    /// List available skills.
    #[command(alias = "ls")]
    Skills,

    /// Show a skill's fields, defaults, and variants.
    Show {
        /// Skill name.
        skill: String,
    },

    /// List available profiles.
    Profiles,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

/// Where a skill's explicit input comes from.
#[derive(Args, Debug, Clone, Default)]
pub struct InputArgs {
    /// YAML or JSON file of field values.
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Set a field, overriding the input file (repeatable).
    #[arg(long = "set", value_name = "FIELD=VALUE")]
    pub set: Vec<String>,

    /// Append to a list field (repeatable).
    #[arg(long = "add", value_name = "FIELD=VALUE")]
    pub add: Vec<String>,

    /// Apply a named profile.
    #[arg(short, long)]
    pub profile: Option<String>,

    /// Do not inject the `generated_at` timestamp.
    #[arg(long)]
    pub no_timestamp: bool,
}

/// How a rendered document is produced and delivered.
#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Write the document to a file instead of stdout.
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Prompt for fields that have no value yet.
    #[arg(long)]
    pub interactive: bool,

    /// Prompt for list fields too. Implies `--interactive`.
    #[arg(long)]
    pub detailed: bool,
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_incident_shortcut_parses() {
        let cli = Cli::try_parse_from([
            "netops", "incident", "VPN down", "Users cannot connect", "-s", "P1", "--set",
            "checks_done=ping", "-o", "out.md",
        ])
        .unwrap();
        let Commands::Incident {
            title,
            severity,
            input,
            render,
            ..
        } = cli.command
        else {
            panic!("expected incident command");
        };
        assert_eq!(title.as_deref(), Some("VPN down"));
        assert_eq!(severity.as_deref(), Some("P1"));
        assert_eq!(input.set, vec!["checks_done=ping"]);
        assert_eq!(render.output, Some(PathBuf::from("out.md")));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["netops", "skills", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_detailed_parses_without_interactive() {
        let cli = Cli::try_parse_from(["netops", "incident", "--detailed"]).unwrap();
        let Commands::Incident { render, .. } = cli.command else {
            panic!("expected incident command");
        };
        assert!(render.detailed);
        assert!(!render.interactive);
    }

    #[test]
    fn test_config_dir_flag_is_optional() {
        let cli = Cli::try_parse_from(["netops", "skills"]).unwrap();
        assert!(cli.config_dir.is_none());
        let cli = Cli::try_parse_from(["netops", "skills", "--config-dir", "/etc/netops"]).unwrap();
        assert_eq!(cli.config_dir, Some(PathBuf::from("/etc/netops")));
    }
}
