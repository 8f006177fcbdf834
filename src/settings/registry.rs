//! Bundled template registry: settings payloads compiled into the binary.

use sha2::{Digest, Sha256};

use crate::error::{Error, Result};

use super::types::Template;

const SETTINGS_AUTONOMOUS: &[u8] =
    include_bytes!("../../config/templates/settings-autonomous.json");
const SETTINGS_INTERACTIVE: &[u8] =
    include_bytes!("../../config/templates/settings-interactive.json");
const SETTINGS_LOCAL: &[u8] = include_bytes!("../../config/templates/settings.local.json");

/// Registry of bundled settings templates.
///
/// Templates are embedded at compile time, so lookups never touch the
/// filesystem.
pub struct TemplateRegistry;

impl TemplateRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Bytes of a bundled template.
    pub fn bytes(&self, template: Template) -> &'static [u8] {
        match template {
            Template::SettingsAutonomous => SETTINGS_AUTONOMOUS,
            Template::SettingsInteractive => SETTINGS_INTERACTIVE,
            Template::SettingsLocal => SETTINGS_LOCAL,
        }
    }

    /// Resolve a template by logical name (`settings-local`) or asset file
    /// name (`settings.local.json`).
    pub fn resolve(&self, name: &str) -> Option<Template> {
        Template::all()
            .iter()
            .copied()
            .find(|t| t.name() == name || t.asset_file() == name)
    }

    /// Look up template bytes by name.
    pub fn get(&self, name: &str) -> Option<&'static [u8]> {
        self.resolve(name).map(|t| self.bytes(t))
    }

    /// Look up template bytes by name, failing with `TemplateLoadFailed`.
    pub fn load(&self, name: &str) -> Result<&'static [u8]> {
        self.get(name).ok_or_else(|| Error::template_load_failed(name))
    }

    /// List all bundled templates with size and digest.
    pub fn list(&self) -> Vec<TemplateListing> {
        Template::all()
            .iter()
            .map(|t| {
                let bytes = self.bytes(*t);
                TemplateListing {
                    template: *t,
                    asset_file: t.asset_file(),
                    size: bytes.len(),
                    sha256: hex::encode(Sha256::digest(bytes)),
                }
            })
            .collect()
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Summary of a bundled template.
#[derive(Debug, Clone)]
pub struct TemplateListing {
    pub template: Template,
    pub asset_file: &'static str,
    pub size: usize,
    pub sha256: String,
}
