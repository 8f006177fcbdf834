//! Version and build information
//!
//! Values are embedded by `build.rs` at compile time.

use std::fmt;

use crate::settings::TemplateRegistry;

/// Build information embedded at compile time
#[derive(Debug, Clone)]
pub struct BuildInfo {
    pub name: &'static str,
    pub version: &'static str,
    /// Git commit hash (short)
    pub git_hash: &'static str,
    pub git_branch: &'static str,
    git_dirty_str: &'static str,
    pub build_timestamp: &'static str,
    /// Target triple (e.g., x86_64-unknown-linux-gnu)
    pub target: &'static str,
    /// Build profile (debug/release)
    pub profile: &'static str,
    pub rustc_version: &'static str,
}

impl BuildInfo {
    /// Get the current build information
    pub const fn current() -> Self {
        Self {
            name: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            git_hash: env!("ROLE_SETTINGS_GIT_HASH"),
            git_branch: env!("ROLE_SETTINGS_GIT_BRANCH"),
            git_dirty_str: env!("ROLE_SETTINGS_GIT_DIRTY"),
            build_timestamp: env!("ROLE_SETTINGS_BUILD_TIMESTAMP"),
            target: env!("ROLE_SETTINGS_TARGET"),
            profile: env!("ROLE_SETTINGS_PROFILE"),
            rustc_version: env!("ROLE_SETTINGS_RUSTC_VERSION"),
        }
    }

    /// Whether the working directory was dirty at build time
    pub fn git_dirty(&self) -> bool {
        self.git_dirty_str == "true"
    }

    /// Full version string (e.g., "0.1.0-abc1234")
    pub fn full_version(&self) -> String {
        if self.git_dirty() {
            format!("{}-{}-dirty", self.version, self.git_hash)
        } else {
            format!("{}-{}", self.version, self.git_hash)
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} {}", self.name, self.full_version())?;
        writeln!(f)?;
        writeln!(f, "Build Information:")?;
        writeln!(f, "  Version:    {}", self.version)?;
        writeln!(f, "  Git Hash:   {}", self.git_hash)?;
        writeln!(f, "  Git Branch: {}", self.git_branch)?;
        writeln!(f, "  Built:      {}", self.build_timestamp)?;
        writeln!(f, "  Profile:    {}", self.profile)?;
        writeln!(f, "  Target:     {}", self.target)?;
        writeln!(f, "  Compiler:   {}", self.rustc_version)?;
        writeln!(f)?;
        // Operators compare these against a work dir's files to spot drift.
        writeln!(f, "Bundled Templates:")?;
        for listing in TemplateRegistry::new().list() {
            writeln!(f, "  {:<22} {}", listing.template.name(), &listing.sha256[..12])?;
        }
        Ok(())
    }
}

/// Get the current build info
pub fn build_info() -> BuildInfo {
    BuildInfo::current()
}

/// Print version information to stdout
pub fn print_version() {
    print!("{}", build_info());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_info_exists() {
        let info = build_info();
        assert_eq!(info.name, "role-settings");
        assert!(!info.version.is_empty());
    }

    #[test]
    fn test_full_version_format() {
        let info = build_info();
        let full = info.full_version();
        assert!(full.starts_with(info.version));
        assert!(full.contains(info.git_hash));
    }

    #[test]
    fn test_display_lists_templates() {
        let display = build_info().to_string();
        assert!(display.contains("Git Hash:"));
        assert!(display.contains("Git Branch:"));
        assert!(display.contains("settings-autonomous"));
        assert!(display.contains("settings-local"));
    }
}
