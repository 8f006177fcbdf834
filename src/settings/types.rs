//! Core types for settings provisioning.
//!
//! Roles are opaque strings. What matters to provisioning is which behavioral
//! category a role falls into, and which bundled template that category seeds.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────
// Role Category
// ─────────────────────────────────────────────────────────────────

/// Roles that may be triggered externally, with no human at the prompt.
pub const AUTONOMOUS_ROLES: &[&str] = &["polecat", "witness", "refinery"];

/// Behavioral category of an agent role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleCategory {
    /// Runs unattended; mail is injected at session start.
    Autonomous,
    /// Waits on user input; mail is injected on prompt submit.
    Interactive,
}

impl RoleCategory {
    /// Lowercase slug used in CLI args and JSON output.
    pub fn slug(&self) -> &'static str {
        match self {
            RoleCategory::Autonomous => "autonomous",
            RoleCategory::Interactive => "interactive",
        }
    }
}

impl fmt::Display for RoleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

impl FromStr for RoleCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "autonomous" => Ok(RoleCategory::Autonomous),
            "interactive" => Ok(RoleCategory::Interactive),
            _ => Err(format!(
                "Unknown role category '{}'. Valid: autonomous, interactive",
                s
            )),
        }
    }
}

/// Classify a role name. Total: anything not in [`AUTONOMOUS_ROLES`] is
/// interactive, including the empty string.
pub fn classify(role: &str) -> RoleCategory {
    if AUTONOMOUS_ROLES.contains(&role) {
        RoleCategory::Autonomous
    } else {
        RoleCategory::Interactive
    }
}

// ─────────────────────────────────────────────────────────────────
// Template
// ─────────────────────────────────────────────────────────────────

/// The bundled settings templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Template {
    SettingsAutonomous,
    SettingsInteractive,
    SettingsLocal,
}

impl Template {
    /// Logical name the template is addressed by.
    pub fn name(&self) -> &'static str {
        match self {
            Template::SettingsAutonomous => "settings-autonomous",
            Template::SettingsInteractive => "settings-interactive",
            Template::SettingsLocal => "settings-local",
        }
    }

    /// File name of the bundled asset under `config/templates/`.
    pub fn asset_file(&self) -> &'static str {
        match self {
            Template::SettingsAutonomous => "settings-autonomous.json",
            Template::SettingsInteractive => "settings-interactive.json",
            Template::SettingsLocal => "settings.local.json",
        }
    }

    /// The settings.json template seeded for a category.
    pub fn for_category(category: RoleCategory) -> Self {
        match category {
            RoleCategory::Autonomous => Template::SettingsAutonomous,
            RoleCategory::Interactive => Template::SettingsInteractive,
        }
    }

    /// All bundled templates.
    pub fn all() -> &'static [Template] {
        &[
            Template::SettingsAutonomous,
            Template::SettingsInteractive,
            Template::SettingsLocal,
        ]
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ─────────────────────────────────────────────────────────────────
// Outcomes and Status
// ─────────────────────────────────────────────────────────────────

/// What a provisioning call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProvisionOutcome {
    /// The file was absent and has been written from its template.
    Created,
    /// The file already existed and was left alone.
    AlreadyPresent,
}

impl ProvisionOutcome {
    pub fn is_created(&self) -> bool {
        matches!(self, ProvisionOutcome::Created)
    }
}

impl fmt::Display for ProvisionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvisionOutcome::Created => write!(f, "created"),
            ProvisionOutcome::AlreadyPresent => write!(f, "present"),
        }
    }
}

/// State of one target file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TargetStatus {
    /// Absolute or caller-relative path of the target file.
    pub path: PathBuf,

    /// Template provisioning would seed this file from.
    pub template: Template,

    /// Whether the file exists.
    pub present: bool,

    /// Whether existing content equals the template. `None` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matches_template: Option<bool>,
}

/// Read-only report on both provisioned files in a work directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettingsStatus {
    pub work_dir: PathBuf,
    pub category: RoleCategory,
    pub settings: TargetStatus,
    pub local_settings: TargetStatus,
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
