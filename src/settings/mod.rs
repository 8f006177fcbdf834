//! Settings provisioning: role-aware default `.claude/` settings files.
//!
//! Each agent's work directory gets a `settings.json` chosen by the agent's
//! role category, and a `settings.local.json` carrying permissions. Both are
//! seeded once from bundled templates and then left to their owners.

pub mod provisioner;
pub mod registry;
pub mod types;

pub use provisioner::{
    ensure_local_settings, ensure_settings, ensure_settings_for_role, inspect,
    local_settings_path, settings_path,
};
pub use registry::{TemplateListing, TemplateRegistry};
pub use types::{
    classify, ProvisionOutcome, RoleCategory, SettingsStatus, TargetStatus, Template,
    AUTONOMOUS_ROLES,
};
