//! Configuration system for role-settings
//!
//! Supports multiple configuration sources with the following precedence (highest to lowest):
//! 1. CLI arguments
//! 2. Environment variables (ROLE_SETTINGS_* prefix)
//! 3. Configuration file (TOML)
//! 4. Default values

use std::fs;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionerConfig {
    /// Provisioning defaults
    pub provision: ProvisionSettings,

    /// Logging configuration
    pub logging: LoggingSettings,
}

/// Provisioning defaults used when the CLI does not override them
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisionSettings {
    /// Work directory whose `.claude/` is provisioned
    pub work_dir: String,

    /// Default agent role (unset = interactive)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Also seed settings.local.json on `ensure`
    pub local_settings: bool,
}

/// Logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Log level: trace, debug, info, warn, error
    pub level: String,

    /// Log file path (empty = no file logging)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,

    /// Maximum log file size in MB before rotation
    pub max_file_size_mb: u64,

    /// Number of rotated log files to keep
    pub max_files: u32,

    /// Enable JSON formatted logging
    pub json_format: bool,
}

impl Default for ProvisionSettings {
    fn default() -> Self {
        Self {
            work_dir: ".".to_string(),
            role: None,
            local_settings: true,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            file: None,
            max_file_size_mb: 10,
            max_files: 5,
            json_format: false,
        }
    }
}

impl ProvisionerConfig {
    /// Load configuration from file with environment variable overrides
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let mut config = Self::default();

        // 1. Load from config file if it exists
        if let Some(path) = Self::find_config_file(config_path)? {
            debug!(path = %path.display(), "Loading configuration file");
            let content = fs::read_to_string(&path).map_err(|e| {
                Error::Config(format!("Failed to read config file {}: {}", path.display(), e))
            })?;
            config = toml::from_str(&content).map_err(|e| Error::ConfigParse {
                message: format!("{}: {}", path.display(), e.message()),
                source: Some(e),
            })?;
            info!(path = %path.display(), "Configuration loaded from file");
        }

        // 2. Apply environment variable overrides
        config.apply_env_overrides();

        // 3. Expand paths
        config.expand_paths();

        // 4. Validate
        config.validate()?;

        Ok(config)
    }

    /// Find the configuration file to use
    fn find_config_file(explicit_path: Option<&str>) -> Result<Option<PathBuf>> {
        // If explicit path provided, use it (error if not found)
        if let Some(path) = explicit_path {
            let path = PathBuf::from(expand_path(path));
            if path.exists() {
                return Ok(Some(path));
            }
            return Err(Error::config_not_found(path));
        }

        for path in &Self::search_paths() {
            if path.exists() {
                debug!(path = %path.display(), "Found configuration file");
                return Ok(Some(path.clone()));
            }
        }

        debug!("No configuration file found, using defaults");
        Ok(None)
    }

    /// Standard configuration locations, in search order
    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("role-settings.toml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("role-settings").join("config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".role-settings").join("config.toml"));
        }
        paths
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        // Provision settings
        if let Ok(val) = std::env::var("ROLE_SETTINGS_WORK_DIR") {
            self.provision.work_dir = val;
        }
        if let Ok(val) = std::env::var("ROLE_SETTINGS_ROLE") {
            self.provision.role = Some(val);
        }
        if let Ok(val) = std::env::var("ROLE_SETTINGS_LOCAL") {
            self.provision.local_settings = parse_bool(&val);
        }

        // Logging settings
        if let Ok(val) = std::env::var("ROLE_SETTINGS_LOG_LEVEL") {
            self.logging.level = val;
        }
        if let Ok(val) = std::env::var("ROLE_SETTINGS_LOG_FILE") {
            self.logging.file = Some(val);
        }
        if let Ok(val) = std::env::var("ROLE_SETTINGS_LOG_JSON") {
            self.logging.json_format = parse_bool(&val);
        }
    }

    /// Expand ~ and other path variables
    fn expand_paths(&mut self) {
        self.provision.work_dir = expand_path(&self.provision.work_dir);

        if let Some(ref file) = self.logging.file {
            self.logging.file = Some(expand_path(file));
        }
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        if self.provision.work_dir.trim().is_empty() {
            return Err(Error::config_field_invalid(
                "provision.work_dir",
                "work_dir cannot be empty",
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(Error::config_field_invalid(
                "logging.level",
                format!(
                    "Invalid log level '{}'. Must be one of: {}",
                    self.logging.level,
                    valid_levels.join(", ")
                ),
            ));
        }

        Ok(())
    }

    /// Get the work directory as a PathBuf
    pub fn work_dir(&self) -> PathBuf {
        PathBuf::from(&self.provision.work_dir)
    }
}

fn parse_bool(val: &str) -> bool {
    val.to_lowercase() == "true" || val == "1"
}

/// Expand ~ and environment variables in paths
fn expand_path(path: &str) -> String {
    shellexpand::full(path)
        .unwrap_or_else(|_| std::borrow::Cow::Borrowed(path))
        .into_owned()
}

/// Default location written by `config init`
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".role-settings")
        .join("config.toml")
}

/// Initialize a new configuration file, returning the path written
pub fn init_config(path: Option<&str>, force: bool) -> Result<PathBuf> {
    let config_path = path
        .map(|p| PathBuf::from(expand_path(p)))
        .unwrap_or_else(default_config_path);

    if config_path.exists() && !force {
        return Err(Error::Config(format!(
            "Configuration file already exists: {}. Use --force to overwrite.",
            config_path.display()
        )));
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .map_err(|e| Error::Config(format!("Failed to create config directory: {}", e)))?;
    }

    fs::write(&config_path, generate_default_config())
        .map_err(|e| Error::Config(format!("Failed to write config file: {}", e)))?;

    info!(path = %config_path.display(), "Configuration file created");
    Ok(config_path)
}

/// Generate default configuration content with comments
fn generate_default_config() -> String {
    r#"# role-settings configuration

[provision]
# Work directory whose .claude/ settings are provisioned
work_dir = "."

# Default agent role. Autonomous roles: polecat, witness, refinery.
# Anything else, or no role at all, gets the interactive template.
# role = "mayor"

# Also seed .claude/settings.local.json when running `ensure`
local_settings = true

[logging]
# Log level: trace, debug, info, warn, error
level = "warn"

# Log file path (comment out to disable file logging)
# file = "~/.role-settings/logs/role-settings.log"

# Maximum log file size in MB before rotation
max_file_size_mb = 10

# Number of rotated log files to keep
max_files = 5

# Enable JSON formatted logging
json_format = false
"#
    .to_string()
}
