//! Build script for role-settings
//!
//! Embeds build-time information into the binary (git commit and branch, build
//! timestamp, target triple, profile, rustc version) and rebuilds when a bundled
//! settings template changes.

use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/index");
    // Templates are pulled in with include_bytes!, list them so edits always rebuild
    println!("cargo:rerun-if-changed=config/templates");

    let git_hash = command_stdout("git", &["rev-parse", "--short=8", "HEAD"]);
    let git_branch = command_stdout("git", &["rev-parse", "--abbrev-ref", "HEAD"]);
    let git_dirty = match command_stdout("git", &["status", "--porcelain"]).as_str() {
        "unknown" => "unknown",
        "" => "false",
        _ => "true",
    };
    let rustc_version = command_stdout(
        &env::var("RUSTC").unwrap_or_else(|_| "rustc".to_string()),
        &["--version"],
    );
    let build_timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();

    let vars = [
        ("GIT_HASH", git_hash),
        ("GIT_BRANCH", git_branch),
        ("GIT_DIRTY", git_dirty.to_string()),
        ("BUILD_TIMESTAMP", build_timestamp),
        ("TARGET", env_or_unknown("TARGET")),
        ("PROFILE", env_or_unknown("PROFILE")),
        ("RUSTC_VERSION", rustc_version),
    ];
    for (key, value) in &vars {
        println!("cargo:rustc-env=ROLE_SETTINGS_{}={}", key, value);
    }
}

fn env_or_unknown(key: &str) -> String {
    env::var(key).unwrap_or_else(|_| "unknown".to_string())
}

/// Trimmed stdout of a successful command, or "unknown".
/// An empty string means the command succeeded with no output.
fn command_stdout(program: &str, args: &[&str]) -> String {
    Command::new(program)
        .args(args)
        .output()
        .ok()
        .filter(|output| output.status.success())
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
