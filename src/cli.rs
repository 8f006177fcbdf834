//! CLI argument parsing using clap v4
//!
//! Defines the command-line interface for role-settings.

use clap::{Parser, Subcommand};

use role_settings::RoleCategory;

/// role-settings - provision agent settings files by role
///
/// Seeds .claude/settings.json and .claude/settings.local.json in an agent's
/// work directory from bundled templates. Existing files are never modified.
#[derive(Parser, Debug)]
#[command(name = "role-settings")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "ROLE_SETTINGS_CONFIG")]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ensure settings.json (and optionally settings.local.json) exist
    Ensure {
        /// Agent work directory (defaults to the configured work_dir)
        #[arg(short, long)]
        work_dir: Option<String>,

        /// Agent role, e.g. polecat, witness, mayor
        #[arg(short, long, conflicts_with = "category")]
        role: Option<String>,

        /// Role category to provision for: autonomous or interactive
        #[arg(long)]
        category: Option<RoleCategory>,

        /// Also ensure settings.local.json
        #[arg(short, long)]
        local: bool,

        /// Skip settings.local.json even if the config enables it
        #[arg(long, conflicts_with = "local")]
        no_local: bool,
    },

    /// Ensure settings.local.json exists
    Local {
        /// Agent work directory (defaults to the configured work_dir)
        #[arg(short, long)]
        work_dir: Option<String>,
    },

    /// Print the category a role is provisioned as
    Classify {
        /// Role name
        role: String,

        /// Print JSON instead of the bare category
        #[arg(long)]
        json: bool,
    },

    /// Report whether the settings files exist and match their templates
    Status {
        /// Agent work directory (defaults to the configured work_dir)
        #[arg(short, long)]
        work_dir: Option<String>,

        /// Agent role used to pick the expected settings.json template
        #[arg(short, long)]
        role: Option<String>,

        /// Print JSON
        #[arg(long)]
        json: bool,
    },

    /// Inspect bundled templates
    Templates {
        #[command(subcommand)]
        subcommand: TemplatesSubcommand,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },

    /// Display version and build information
    Version,
}

/// Template subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum TemplatesSubcommand {
    /// List bundled templates with size and SHA-256
    List,

    /// Print a bundled template's raw content
    Show {
        /// Template name: settings-autonomous, settings-interactive, settings-local
        name: String,
    },
}

/// Configuration subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum ConfigSubcommand {
    /// Display the effective configuration
    Show,

    /// Initialize a new configuration file
    Init {
        /// Path where to create the config file
        #[arg(short, long)]
        path: Option<String>,

        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },

    /// Validate the configuration
    Validate,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ensure_defaults() {
        let cli = Cli::parse_from(["role-settings", "ensure"]);
        match cli.command {
            Commands::Ensure {
                work_dir,
                role,
                category,
                local,
                no_local,
            } => {
                assert!(work_dir.is_none());
                assert!(role.is_none());
                assert!(category.is_none());
                assert!(!local);
                assert!(!no_local);
            }
            _ => panic!("Expected Ensure command"),
        }
    }

    #[test]
    fn test_ensure_with_role() {
        let cli = Cli::parse_from([
            "role-settings",
            "ensure",
            "--work-dir",
            "/tmp/x",
            "--role",
            "witness",
            "--local",
        ]);
        match cli.command {
            Commands::Ensure {
                work_dir,
                role,
                local,
                ..
            } => {
                assert_eq!(work_dir.as_deref(), Some("/tmp/x"));
                assert_eq!(role.as_deref(), Some("witness"));
                assert!(local);
            }
            _ => panic!("Expected Ensure command"),
        }
    }

    #[test]
    fn test_ensure_with_category() {
        let cli = Cli::parse_from(["role-settings", "ensure", "--category", "autonomous"]);
        match cli.command {
            Commands::Ensure { category, .. } => {
                assert_eq!(category, Some(RoleCategory::Autonomous));
            }
            _ => panic!("Expected Ensure command"),
        }
    }

    #[test]
    fn test_role_and_category_conflict() {
        let result = Cli::try_parse_from([
            "role-settings",
            "ensure",
            "--role",
            "mayor",
            "--category",
            "autonomous",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_category() {
        let result = Cli::try_parse_from(["role-settings", "ensure", "--category", "polecat"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_classify() {
        let cli = Cli::parse_from(["role-settings", "classify", "refinery", "--json"]);
        match cli.command {
            Commands::Classify { role, json } => {
                assert_eq!(role, "refinery");
                assert!(json);
            }
            _ => panic!("Expected Classify command"),
        }
    }

    #[test]
    fn test_templates_show() {
        let cli = Cli::parse_from(["role-settings", "templates", "show", "settings-local"]);
        match cli.command {
            Commands::Templates {
                subcommand: TemplatesSubcommand::Show { name },
            } => assert_eq!(name, "settings-local"),
            _ => panic!("Expected Templates Show command"),
        }
    }

    #[test]
    fn test_global_flags() {
        let cli = Cli::parse_from(["role-settings", "-vv", "--config", "/etc/rs.toml", "version"]);
        assert_eq!(cli.verbose, 2);
        assert!(!cli.quiet);
        assert_eq!(cli.config.as_deref(), Some("/etc/rs.toml"));
    }

    #[test]
    fn test_config_init() {
        let cli = Cli::parse_from(["role-settings", "config", "init", "--force"]);
        match cli.command {
            Commands::Config {
                subcommand: ConfigSubcommand::Init { path, force },
            } => {
                assert!(path.is_none());
                assert!(force);
            }
            _ => panic!("Expected Config Init command"),
        }
    }
}
