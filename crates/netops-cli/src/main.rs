//! NetOps Skills CLI entry point.
//!
//! Binary name: `netops`
//!
//! Parses CLI arguments, loads the skill configuration, then dispatches to the
//! appropriate command handler.

mod cli;

use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;

use cli::run::{OutputMode, run_skill};
use cli::{Cli, Commands};
use netops_infra::paths::{resolve_config_source, user_profiles_path};
use netops_observe::LogFormat;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let format = if cli.log_json { LogFormat::Json } else { LogFormat::Pretty };
    if let Err(err) = netops_observe::init_tracing(cli.verbose, cli.quiet, format) {
        eprintln!("failed to initialize logging: {err}");
    }

    let json = cli.json;
    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "command failed");
            cli::output::report_error(&err, json);
            ExitCode::FAILURE
        }
    }
}

fn dispatch(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need configuration
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = Cli::command();
        generate(*shell, &mut cmd, "netops", &mut std::io::stdout());
        return Ok(());
    }

    let source = resolve_config_source(cli.config_dir);
    let config = netops_infra::load(source, user_profiles_path().as_deref())?;
    let mode = OutputMode {
        json: cli.json,
        quiet: cli.quiet,
    };

    match cli.command {
        Commands::Run {
            skill,
            input,
            render,
        } => run_skill(&config, &skill, &input, &render, &[], mode),

        Commands::Incident {
            title,
            impact,
            audience,
            severity,
            status,
            input,
            render,
        } => run_skill(
            &config,
            "incident",
            &input,
            &render,
            &[
                ("incident_title", title),
                ("impact_summary", impact),
                ("audience", audience),
                ("severity", severity),
                ("current_status", status),
            ],
            mode,
        ),

        Commands::Runbook {
            domain,
            symptom,
            access_mode,
            environment,
            input,
            render,
        } => run_skill(
            &config,
            "runbook",
            &input,
            &render,
            &[
                ("domain", domain),
                ("symptom_category", symptom),
                ("access_mode", access_mode),
                ("environment", environment),
            ],
            mode,
        ),

        Commands::Fcr {
            purpose,
            change_type,
            risk,
            input,
            render,
        } => run_skill(
            &config,
            "fcr",
            &input,
            &render,
            &[
                ("purpose", purpose),
                ("change_type", change_type),
                ("risk_level", risk),
            ],
            mode,
        ),

        Commands::Validate { skill, input } => {
            cli::validate::validate_input(&config, &skill, &input, cli.json)
        }

        Commands::Skills => cli::listing::list_skills(&config.registry, cli.json),

        Commands::Show { skill } => cli::listing::show_skill(&config.registry, &skill, cli.json),

        Commands::Profiles => cli::listing::list_profiles(&config.registry, cli.json),

        Commands::Completions { .. } => Ok(()),
    }
}
