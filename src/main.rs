//! role-settings - provision agent settings files by role
//!
//! This is the entry point for the `role-settings` binary. Orchestrators call
//! it when spawning an agent so the agent's work directory has settings
//! matching its role before the agent starts.

mod cli;

use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{debug, error, info, warn};

use role_settings::config::{self, ProvisionerConfig};
use role_settings::error::Result;
use role_settings::logging;
use role_settings::settings::{self, ProvisionOutcome, RoleCategory, TemplateRegistry};
use role_settings::version;

use crate::cli::{Cli, Commands, ConfigSubcommand, TemplatesSubcommand};

fn main() {
    // Parse CLI arguments first (before logging, so we know verbosity)
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        if e.is_fatal() {
            error!("{}", e.format_for_log());
        } else {
            warn!("{}", e.format_for_log());
        }
        eprint!("{}", e.format_for_terminal());
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<()> {
    // For commands that don't need full logging, use simple setup
    match cli.command {
        Commands::Version => {
            version::print_version();
            return Ok(());
        }
        Commands::Config { ref subcommand } => {
            logging::init_simple(tracing::Level::WARN)?;
            return handle_config_command(subcommand.clone(), cli.config.as_deref());
        }
        _ => {}
    }

    let config = ProvisionerConfig::load(cli.config.as_deref())?;

    // The guards must be kept alive for the lifetime of the program
    let _log_guards = logging::init_logging(&config.logging, cli.verbose, cli.quiet)?;

    let build = version::build_info();
    debug!(version = %build.full_version(), "Starting role-settings");

    match cli.command {
        Commands::Ensure {
            work_dir,
            role,
            category,
            local,
            no_local,
        } => {
            let work_dir = resolve_work_dir(&config, work_dir);
            let role = role.or_else(|| config.provision.role.clone());
            let with_local = local || (config.provision.local_settings && !no_local);
            run_ensure(work_dir, role, category, with_local, cli.quiet)
        }
        Commands::Local { work_dir } => {
            let work_dir = resolve_work_dir(&config, work_dir);
            let outcome = settings::ensure_local_settings(&work_dir)?;
            report(outcome, &settings::local_settings_path(&work_dir), cli.quiet);
            Ok(())
        }
        Commands::Classify { role, json } => {
            let category = settings::classify(&role);
            if json {
                let value = serde_json::json!({ "role": role, "category": category });
                println!("{}", serde_json::to_string(&value)?);
            } else {
                println!("{}", category);
            }
            Ok(())
        }
        Commands::Status {
            work_dir,
            role,
            json,
        } => {
            let work_dir = resolve_work_dir(&config, work_dir);
            let role = role.or_else(|| config.provision.role.clone());
            run_status(work_dir, role.as_deref().unwrap_or_default(), json)
        }
        Commands::Templates { subcommand } => handle_templates_command(subcommand),
        Commands::Version | Commands::Config { .. } => {
            // Already handled above
            unreachable!();
        }
    }
}

/// CLI flag wins over the configured work_dir
fn resolve_work_dir(config: &ProvisionerConfig, cli_dir: Option<String>) -> PathBuf {
    cli_dir
        .map(|d| PathBuf::from(shellexpand::tilde(&d).into_owned()))
        .unwrap_or_else(|| config.work_dir())
}

/// Provision settings.json, then settings.local.json if requested
fn run_ensure(
    work_dir: PathBuf,
    role: Option<String>,
    category: Option<RoleCategory>,
    with_local: bool,
    quiet: bool,
) -> Result<()> {
    info!(
        work_dir = %work_dir.display(),
        role = ?role,
        category = ?category,
        local = with_local,
        "Provisioning settings"
    );

    // An explicit category wins; otherwise an unset role classifies as interactive.
    let outcome = match category {
        Some(category) => settings::ensure_settings(&work_dir, category)?,
        None => settings::ensure_settings_for_role(&work_dir, role.as_deref().unwrap_or_default())?,
    };
    report(outcome, &settings::settings_path(&work_dir), quiet);

    if with_local {
        let outcome = settings::ensure_local_settings(&work_dir)?;
        report(outcome, &settings::local_settings_path(&work_dir), quiet);
    }

    Ok(())
}

fn report(outcome: ProvisionOutcome, path: &Path, quiet: bool) {
    if !quiet {
        println!("{} {}", outcome, path.display());
    }
}

fn run_status(work_dir: PathBuf, role: &str, json: bool) -> Result<()> {
    let status = settings::inspect(&work_dir, settings::classify(role))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&status)?);
        return Ok(());
    }

    println!("Work dir:  {}", status.work_dir.display());
    println!("Category:  {}", status.category);
    for target in [&status.settings, &status.local_settings] {
        let state = match target.matches_template {
            None => "absent".to_string(),
            Some(true) => format!("present (matches {})", target.template),
            Some(false) => format!("present (differs from {})", target.template),
        };
        println!("  {:<48} {}", target.path.display(), state);
    }

    Ok(())
}

/// Handle template subcommands
fn handle_templates_command(subcommand: TemplatesSubcommand) -> Result<()> {
    let registry = TemplateRegistry::new();

    match subcommand {
        TemplatesSubcommand::List => {
            println!("{:<22} {:<26} {:>6}  SHA-256", "NAME", "ASSET", "BYTES");
            for listing in registry.list() {
                println!(
                    "{:<22} {:<26} {:>6}  {}",
                    listing.template.name(),
                    listing.asset_file,
                    listing.size,
                    listing.sha256
                );
            }
        }
        TemplatesSubcommand::Show { name } => {
            let bytes = registry.load(&name)?;
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(bytes)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Handle configuration subcommands
fn handle_config_command(subcommand: ConfigSubcommand, config_path: Option<&str>) -> Result<()> {
    match subcommand {
        ConfigSubcommand::Show => {
            let cfg = ProvisionerConfig::load(config_path)?;
            println!("{}", toml::to_string_pretty(&cfg)?);
        }
        ConfigSubcommand::Init { path, force } => {
            let written = config::init_config(path.as_deref(), force)?;
            println!("Configuration file created: {}", written.display());
        }
        ConfigSubcommand::Validate => {
            ProvisionerConfig::load(config_path)?;
            println!("Configuration is valid.");
        }
    }

    Ok(())
}
