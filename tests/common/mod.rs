//! Common test utilities and fixtures
//!
//! This module provides shared test infrastructure

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

/// Get the path to the test fixtures directory
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

/// Get a path to a specific fixture file
pub fn fixture_path(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

/// Bundled template content, read from the source tree
pub fn template(asset_file: &str) -> Vec<u8> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("config")
        .join("templates")
        .join(asset_file);
    fs::read(path).unwrap()
}

/// An isolated home directory plus an agent work directory
pub struct Sandbox {
    home: TempDir,
    work: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            home: TempDir::new().unwrap(),
            work: TempDir::new().unwrap(),
        }
    }

    pub fn home(&self) -> &Path {
        self.home.path()
    }

    pub fn work_dir(&self) -> &Path {
        self.work.path()
    }

    pub fn settings(&self) -> PathBuf {
        self.work_dir().join(".claude").join("settings.json")
    }

    pub fn local_settings(&self) -> PathBuf {
        self.work_dir().join(".claude").join("settings.local.json")
    }

    /// A `role-settings` command that cannot pick up the caller's config
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("role-settings").unwrap();
        cmd.current_dir(self.home())
            .env("HOME", self.home())
            .env("XDG_CONFIG_HOME", self.home().join(".config"))
            .env_remove("ROLE_SETTINGS_CONFIG")
            .env_remove("ROLE_SETTINGS_WORK_DIR")
            .env_remove("ROLE_SETTINGS_ROLE")
            .env_remove("ROLE_SETTINGS_LOCAL")
            .env_remove("ROLE_SETTINGS_LOG_LEVEL")
            .env_remove("RUST_LOG");
        cmd
    }
}
