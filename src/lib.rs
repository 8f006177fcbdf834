//! role-settings - role-aware provisioning of agent settings files
//!
//! Seeds `.claude/settings.json` and `.claude/settings.local.json` in an
//! agent's work directory from templates compiled into the crate. Files that
//! already exist are never touched.

pub mod config;
pub mod error;
pub mod logging;
pub mod settings;
pub mod version;

pub use error::{Error, ErrorCode, Result};
pub use settings::{
    classify, ensure_local_settings, ensure_settings, ensure_settings_for_role, inspect,
    ProvisionOutcome, RoleCategory, SettingsStatus, Template, TemplateRegistry,
};
