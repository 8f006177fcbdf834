//! Settings provisioner: seed `.claude/` settings files from bundled templates.
//!
//! Provisioning is one-shot. A target file is written only when it is absent,
//! and once present it is never read, rewritten or removed here.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{Error, Result};

use super::registry::TemplateRegistry;
use super::types::{
    classify, ProvisionOutcome, RoleCategory, SettingsStatus, TargetStatus, Template,
};

// ─────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────

/// Directory under the work dir that holds the settings files.
pub const SETTINGS_DIR: &str = ".claude";
pub const SETTINGS_FILE: &str = "settings.json";
pub const LOCAL_SETTINGS_FILE: &str = "settings.local.json";

#[cfg(unix)]
const DIR_MODE: u32 = 0o755;
#[cfg(unix)]
const FILE_MODE: u32 = 0o644;

/// Most dangling links followed when writing a new settings file.
const MAX_LINK_HOPS: usize = 40;

/// Path of `settings.json` for a work directory.
pub fn settings_path(work_dir: &Path) -> PathBuf {
    work_dir.join(SETTINGS_DIR).join(SETTINGS_FILE)
}

/// Path of `settings.local.json` for a work directory.
pub fn local_settings_path(work_dir: &Path) -> PathBuf {
    work_dir.join(SETTINGS_DIR).join(LOCAL_SETTINGS_FILE)
}

// ─────────────────────────────────────────────────────────────────
// Provisioning
// ─────────────────────────────────────────────────────────────────

/// Ensure `.claude/settings.json` exists, seeding it from the template for
/// `category` if it does not.
pub fn ensure_settings(work_dir: &Path, category: RoleCategory) -> Result<ProvisionOutcome> {
    ensure_file(work_dir, SETTINGS_FILE, Template::for_category(category))
}

/// [`ensure_settings`] with the category derived from a role name.
pub fn ensure_settings_for_role(work_dir: &Path, role: &str) -> Result<ProvisionOutcome> {
    let category = classify(role);
    debug!(role = %role, category = %category, "Classified role");
    ensure_settings(work_dir, category)
}

/// Ensure `.claude/settings.local.json` exists. This file carries the
/// permissions that let agents run without confirmation prompts.
pub fn ensure_local_settings(work_dir: &Path) -> Result<ProvisionOutcome> {
    ensure_file(work_dir, LOCAL_SETTINGS_FILE, Template::SettingsLocal)
}

fn ensure_file(work_dir: &Path, file_name: &str, template: Template) -> Result<ProvisionOutcome> {
    let dir = work_dir.join(SETTINGS_DIR);
    let dest = dir.join(file_name);

    if exists(&dest)? {
        debug!(path = %dest.display(), "Settings file present, leaving unchanged");
        return Ok(ProvisionOutcome::AlreadyPresent);
    }

    create_settings_dir(&dir)?;

    let content = TemplateRegistry::new().load(template.name())?;

    match write_new(&dest, content) {
        Ok(()) => {
            info!(
                path = %dest.display(),
                template = %template,
                bytes = content.len(),
                "Settings file created"
            );
            Ok(ProvisionOutcome::Created)
        }
        // Another process created it between our probe and our write.
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            debug!(path = %dest.display(), "Settings file created concurrently");
            Ok(ProvisionOutcome::AlreadyPresent)
        }
        Err(source) => Err(Error::WriteFailed { path: dest, source }),
    }
}

/// Probe a target path. "Not found" and "a parent is not a directory" both
/// mean absent; any other failure is reported rather than assumed absent.
fn exists(path: &Path) -> Result<bool> {
    match fs::metadata(path) {
        Ok(_) => Ok(true),
        Err(e) if matches!(e.kind(), io::ErrorKind::NotFound | io::ErrorKind::NotADirectory) => {
            Ok(false)
        }
        Err(source) => Err(Error::ExistenceCheckFailed {
            path: path.to_path_buf(),
            source,
        }),
    }
}

fn create_settings_dir(dir: &Path) -> Result<()> {
    if dir.is_dir() {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }

    builder
        .create(dir)
        .map_err(|source| Error::DirectoryCreationFailed {
            path: dir.to_path_buf(),
            source,
        })?;

    info!(path = %dir.display(), "Created settings directory");
    Ok(())
}

/// Write `content` to a file that must not already exist.
///
/// A dangling symlink at `path` is followed and its target created, so the
/// settings file exists afterwards. A link to an existing entry is left alone
/// and reported as `AlreadyExists`.
fn write_new(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut target = path.to_path_buf();

    for _ in 0..MAX_LINK_HOPS {
        let err = match open_new(&target) {
            Ok(mut file) => return file.write_all(content),
            Err(e) => e,
        };
        if err.kind() != io::ErrorKind::AlreadyExists {
            return Err(err);
        }

        match dangling_link(&target)? {
            Some(next) => {
                debug!(
                    link = %target.display(),
                    target = %next.display(),
                    "Following dangling link"
                );
                target = next;
            }
            None => return Err(err),
        }
    }

    Err(io::Error::other(format!(
        "too many levels of symbolic links: {}",
        path.display()
    )))
}

fn open_new(path: &Path) -> io::Result<fs::File> {
    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }
    options.open(path)
}

/// The path a symlink points at, if `path` is a symlink whose target is missing.
fn dangling_link(path: &Path) -> io::Result<Option<PathBuf>> {
    if !fs::symlink_metadata(path)?.file_type().is_symlink() {
        return Ok(None);
    }
    match fs::metadata(path) {
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        _ => return Ok(None),
    }

    let link = fs::read_link(path)?;
    Ok(Some(match path.parent() {
        Some(parent) => parent.join(link),
        None => link,
    }))
}

// ─────────────────────────────────────────────────────────────────
// Inspection
// ─────────────────────────────────────────────────────────────────

/// Report the state of both target files without modifying anything.
pub fn inspect(work_dir: &Path, category: RoleCategory) -> Result<SettingsStatus> {
    let registry = TemplateRegistry::new();

    Ok(SettingsStatus {
        work_dir: work_dir.to_path_buf(),
        category,
        settings: target_status(
            &registry,
            settings_path(work_dir),
            Template::for_category(category),
        )?,
        local_settings: target_status(
            &registry,
            local_settings_path(work_dir),
            Template::SettingsLocal,
        )?,
    })
}

fn target_status(
    registry: &TemplateRegistry,
    path: PathBuf,
    template: Template,
) -> Result<TargetStatus> {
    let present = exists(&path)?;
    let matches_template = if present {
        let existing = fs::read(&path).map_err(|source| Error::ExistenceCheckFailed {
            path: path.clone(),
            source,
        })?;
        Some(existing == registry.bytes(template))
    } else {
        None
    };

    Ok(TargetStatus {
        path,
        template,
        present,
        matches_template,
    })
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn template_bytes(template: Template) -> &'static [u8] {
        TemplateRegistry::new().bytes(template)
    }

    #[test]
    fn test_creates_settings_for_category() {
        let tmp = TempDir::new().unwrap();

        let outcome = ensure_settings(tmp.path(), RoleCategory::Interactive).unwrap();
        assert_eq!(outcome, ProvisionOutcome::Created);

        let written = fs::read(settings_path(tmp.path())).unwrap();
        assert_eq!(written, template_bytes(Template::SettingsInteractive));
    }

    #[test]
    fn test_second_call_is_noop() {
        let tmp = TempDir::new().unwrap();
        ensure_settings(tmp.path(), RoleCategory::Autonomous).unwrap();

        let outcome = ensure_settings(tmp.path(), RoleCategory::Interactive).unwrap();
        assert_eq!(outcome, ProvisionOutcome::AlreadyPresent);

        let written = fs::read(settings_path(tmp.path())).unwrap();
        assert_eq!(written, template_bytes(Template::SettingsAutonomous));
    }

    #[test]
    fn test_local_settings_created() {
        let tmp = TempDir::new().unwrap();
        let outcome = ensure_local_settings(tmp.path()).unwrap();
        assert!(outcome.is_created());

        let written = fs::read(local_settings_path(tmp.path())).unwrap();
        assert_eq!(written, template_bytes(Template::SettingsLocal));
        assert!(!settings_path(tmp.path()).exists());
    }

    #[test]
    fn test_settings_dir_is_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(SETTINGS_DIR), b"not a dir").unwrap();

        let err = ensure_settings(tmp.path(), RoleCategory::Autonomous).unwrap_err();
        assert!(matches!(err, Error::DirectoryCreationFailed { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_modes() {
        use std::os::unix::fs::PermissionsExt;

        let tmp = TempDir::new().unwrap();
        ensure_local_settings(tmp.path()).unwrap();

        let dir_mode = fs::metadata(tmp.path().join(SETTINGS_DIR))
            .unwrap()
            .permissions()
            .mode();
        let file_mode = fs::metadata(local_settings_path(tmp.path()))
            .unwrap()
            .permissions()
            .mode();

        // Masked by the process umask, so only check nothing beyond the intent is set.
        assert_eq!(dir_mode & 0o777 & !DIR_MODE, 0);
        assert_eq!(file_mode & 0o777 & !FILE_MODE, 0);
        assert_ne!(file_mode & 0o600, 0);
    }

    #[test]
    fn test_inspect_absent_then_present() {
        let tmp = TempDir::new().unwrap();

        let status = inspect(tmp.path(), RoleCategory::Autonomous).unwrap();
        assert!(!status.settings.present);
        assert!(status.settings.matches_template.is_none());
        assert!(!status.local_settings.present);

        ensure_settings(tmp.path(), RoleCategory::Autonomous).unwrap();
        fs::create_dir_all(tmp.path().join(SETTINGS_DIR)).unwrap();
        fs::write(local_settings_path(tmp.path()), b"{\"custom\":true}").unwrap();

        let status = inspect(tmp.path(), RoleCategory::Autonomous).unwrap();
        assert_eq!(status.settings.matches_template, Some(true));
        assert_eq!(status.local_settings.matches_template, Some(false));

        // Inspection against the other category reports drift, not an error.
        let status = inspect(tmp.path(), RoleCategory::Interactive).unwrap();
        assert_eq!(status.settings.matches_template, Some(false));
    }

    #[cfg(unix)]
    #[test]
    fn test_write_new_follows_dangling_link_chain() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        let first = tmp.path().join("first.json");
        symlink("second.json", &first).unwrap();
        symlink("third.json", tmp.path().join("second.json")).unwrap();

        write_new(&first, b"{}").unwrap();

        assert_eq!(fs::read(tmp.path().join("third.json")).unwrap(), b"{}");
        assert!(fs::symlink_metadata(&first).unwrap().file_type().is_symlink());
    }

    #[cfg(unix)]
    #[test]
    fn test_write_new_leaves_live_link_alone() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("real.json"), b"mine").unwrap();
        let link = tmp.path().join("link.json");
        symlink("real.json", &link).unwrap();

        let err = write_new(&link, b"{}").unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(fs::read(tmp.path().join("real.json")).unwrap(), b"mine");
    }

    #[cfg(unix)]
    #[test]
    fn test_inspect_treats_dangling_link_as_absent() {
        use std::os::unix::fs::symlink;

        let tmp = TempDir::new().unwrap();
        fs::create_dir(tmp.path().join(SETTINGS_DIR)).unwrap();
        symlink("nowhere.json", settings_path(tmp.path())).unwrap();

        let status = inspect(tmp.path(), RoleCategory::Autonomous).unwrap();
        assert!(!status.settings.present);

        let outcome = ensure_settings(tmp.path(), RoleCategory::Autonomous).unwrap();
        assert_eq!(outcome, ProvisionOutcome::Created);

        let status = inspect(tmp.path(), RoleCategory::Autonomous).unwrap();
        assert!(status.settings.present);
        assert_eq!(status.settings.matches_template, Some(true));
    }

    #[test]
    fn test_inspect_does_not_create() {
        let tmp = TempDir::new().unwrap();
        inspect(tmp.path(), RoleCategory::Interactive).unwrap();
        assert!(!tmp.path().join(SETTINGS_DIR).exists());
    }
}
