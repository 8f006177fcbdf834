//! Error types for role-settings
//!
//! Provides structured error handling with:
//! - Numeric error codes for machine parsing
//! - User-friendly messages with suggestions
//! - Exit codes for CLI

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for provisioning operations
pub type Result<T> = std::result::Result<T, Error>;

/// Numeric error codes for machine parsing and documentation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum ErrorCode {
    // Configuration errors (1xx)
    ConfigNotFound = 100,
    ConfigParseError = 101,
    ConfigValidation = 102,

    // IO errors (2xx)
    IoRead = 200,
    IoWrite = 201,
    IoPermission = 202,
    IoNotFound = 203,

    // Provisioning errors (3xx)
    DirectoryCreationFailed = 300,
    TemplateLoadFailed = 301,
    WriteFailed = 302,
    ExistenceCheckFailed = 303,
}

impl ErrorCode {
    /// Get the string code (e.g., "E300")
    pub fn as_str(&self) -> String {
        format!("E{}", *self as u16)
    }

    /// Get the exit code for CLI (maps to 1-125 range)
    pub fn exit_code(&self) -> i32 {
        match *self as u16 {
            100..=199 => 10, // Config errors
            200..=299 => 20, // IO errors
            300..=399 => 30, // Provisioning errors
            _ => 1,
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Main error type
#[derive(Error, Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Provisioning Errors
    // ─────────────────────────────────────────────────────────────

    /// The `.claude` directory could not be created
    #[error("Failed to create settings directory: {path}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A bundled template is missing from the binary
    #[error("Bundled template not found: {name}")]
    TemplateLoadFailed { name: String },

    /// The destination settings file could not be written
    #[error("Failed to write settings file: {path}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Probing the destination failed for a reason other than "not found"
    #[error("Failed to check settings file: {path}")]
    ExistenceCheckFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────

    /// Configuration file not found
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Configuration parse error
    #[error("Failed to parse configuration: {message}")]
    ConfigParse {
        message: String,
        #[source]
        source: Option<toml::de::Error>,
    },

    /// Configuration validation error
    #[error("Configuration validation failed: {message}")]
    ConfigValidation { message: String, field: Option<String> },

    /// Generic configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    // ─────────────────────────────────────────────────────────────
    // IO / Serialization Errors
    // ─────────────────────────────────────────────────────────────

    /// Generic IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML serialization error
    #[error("TOML serialization error: {0}")]
    Toml(#[from] toml::ser::Error),

    /// JSON serialization error
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    // ─────────────────────────────────────────────────────────────
    // Error Classification
    // ─────────────────────────────────────────────────────────────

    /// Get the numeric error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::DirectoryCreationFailed { .. } => ErrorCode::DirectoryCreationFailed,
            Error::TemplateLoadFailed { .. } => ErrorCode::TemplateLoadFailed,
            Error::WriteFailed { .. } => ErrorCode::WriteFailed,
            Error::ExistenceCheckFailed { .. } => ErrorCode::ExistenceCheckFailed,

            Error::ConfigNotFound { .. } => ErrorCode::ConfigNotFound,
            Error::ConfigParse { .. } => ErrorCode::ConfigParseError,
            Error::ConfigValidation { .. } => ErrorCode::ConfigValidation,
            Error::Config(_) => ErrorCode::ConfigValidation,

            Error::Io(e) => match e.kind() {
                std::io::ErrorKind::NotFound => ErrorCode::IoNotFound,
                std::io::ErrorKind::PermissionDenied => ErrorCode::IoPermission,
                _ => ErrorCode::IoRead,
            },
            Error::Toml(_) => ErrorCode::ConfigParseError,
            Error::Json(_) => ErrorCode::IoWrite,
        }
    }

    /// Check if the error is fatal (a packaging or configuration defect
    /// that retrying cannot fix)
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::TemplateLoadFailed { .. }
                | Error::ConfigNotFound { .. }
                | Error::ConfigParse { .. }
                | Error::ConfigValidation { .. }
        )
    }

    /// Get the exit code for CLI
    pub fn exit_code(&self) -> i32 {
        self.code().exit_code()
    }

    // ─────────────────────────────────────────────────────────────
    // User-Friendly Messages
    // ─────────────────────────────────────────────────────────────

    /// Get a user-friendly suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Error::DirectoryCreationFailed { .. } => Some(
                "Check that the work directory is writable and that '.claude' is not a regular file."
            ),
            Error::TemplateLoadFailed { .. } => Some(
                "This binary was built without its bundled templates. Rebuild or reinstall role-settings."
            ),
            Error::WriteFailed { .. } => Some(
                "Check permissions and free disk space for the '.claude' directory."
            ),
            Error::ExistenceCheckFailed { .. } => Some(
                "The settings path could not be inspected. Check permissions on the work directory."
            ),

            Error::ConfigNotFound { .. } => Some(
                "Run 'role-settings config init' to create a default configuration file."
            ),
            Error::ConfigParse { .. } => Some(
                "Check your configuration file syntax. Run 'role-settings config validate' to see details."
            ),
            Error::ConfigValidation { .. } => Some(
                "Review the configuration file and fix the invalid values."
            ),

            _ => None,
        }
    }

    /// Format the error for terminal display with colors
    pub fn format_for_terminal(&self) -> String {
        let code = self.code();

        let mut output = format!("\x1b[31mError [{}]\x1b[0m: {}\n", code.as_str(), self);

        if let Some(cause) = std::error::Error::source(self) {
            output.push_str(&format!("  caused by: {}\n", cause));
        }

        if let Some(hint) = self.suggestion() {
            output.push_str(&format!("\n\x1b[33mHint\x1b[0m: {}\n", hint));
        }

        output
    }

    /// Format the error for logging (no colors)
    pub fn format_for_log(&self) -> String {
        match std::error::Error::source(self) {
            Some(cause) => format!("[{}] {}: {}", self.code().as_str(), self, cause),
            None => format!("[{}] {}", self.code().as_str(), self),
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// Error Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    /// Create a config not found error
    pub fn config_not_found(path: impl Into<PathBuf>) -> Self {
        Error::ConfigNotFound { path: path.into() }
    }

    /// Create a config validation error with field name
    pub fn config_field_invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Error::ConfigValidation {
            message: message.into(),
            field: Some(field.into()),
        }
    }

    /// Create a template load error
    pub fn template_load_failed(name: impl Into<String>) -> Self {
        Error::TemplateLoadFailed { name: name.into() }
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn io_err(kind: io::ErrorKind) -> io::Error {
        io::Error::new(kind, "boom")
    }

    #[test]
    fn test_error_code_format() {
        assert_eq!(ErrorCode::ConfigNotFound.as_str(), "E100");
        assert_eq!(ErrorCode::DirectoryCreationFailed.as_str(), "E300");
        assert_eq!(ErrorCode::ExistenceCheckFailed.as_str(), "E303");
    }

    #[test]
    fn test_error_exit_codes() {
        assert_eq!(ErrorCode::ConfigNotFound.exit_code(), 10);
        assert_eq!(ErrorCode::IoRead.exit_code(), 20);
        assert_eq!(ErrorCode::WriteFailed.exit_code(), 30);
        assert_eq!(ErrorCode::ConfigValidation.exit_code(), 10);
    }

    #[test]
    fn test_provisioning_codes() {
        let err = Error::DirectoryCreationFailed {
            path: PathBuf::from("/x/.claude"),
            source: io_err(io::ErrorKind::PermissionDenied),
        };
        assert_eq!(err.code(), ErrorCode::DirectoryCreationFailed);

        let err = Error::WriteFailed {
            path: PathBuf::from("/x/.claude/settings.json"),
            source: io_err(io::ErrorKind::Other),
        };
        assert_eq!(err.code(), ErrorCode::WriteFailed);

        let err = Error::template_load_failed("settings-missing");
        assert_eq!(err.code(), ErrorCode::TemplateLoadFailed);
    }

    #[test]
    fn test_error_display_carries_path() {
        let err = Error::ExistenceCheckFailed {
            path: PathBuf::from("/x/.claude/settings.json"),
            source: io_err(io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("/x/.claude/settings.json"));
    }

    #[test]
    fn test_source_is_preserved() {
        let err = Error::WriteFailed {
            path: PathBuf::from("/x"),
            source: io_err(io::ErrorKind::Other),
        };
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "boom");
    }

    #[test]
    fn test_error_fatal() {
        assert!(Error::template_load_failed("x").is_fatal());
        assert!(Error::config_not_found("/test").is_fatal());
        assert!(!Error::WriteFailed {
            path: PathBuf::from("/x"),
            source: io_err(io::ErrorKind::Other),
        }
        .is_fatal());
    }

    #[test]
    fn test_error_suggestions() {
        let err = Error::config_not_found("/test");
        assert!(err.suggestion().unwrap().contains("config init"));

        let err = Error::template_load_failed("x");
        assert!(err.suggestion().unwrap().contains("Rebuild"));
    }

    #[test]
    fn test_format_for_terminal() {
        let err = Error::DirectoryCreationFailed {
            path: PathBuf::from("/x/.claude"),
            source: io_err(io::ErrorKind::AlreadyExists),
        };
        let formatted = err.format_for_terminal();

        assert!(formatted.contains("E300"));
        assert!(formatted.contains("\x1b[31m"));
        assert!(formatted.contains("caused by: boom"));
        assert!(formatted.contains("Hint"));
    }

    #[test]
    fn test_format_for_log() {
        let err = Error::config_not_found("/test/config.toml");
        let formatted = err.format_for_log();

        assert!(formatted.contains("[E100]"));
        assert!(!formatted.contains("\x1b["));
    }

    #[test]
    fn test_error_from_io() {
        let err: Error = io_err(io::ErrorKind::NotFound).into();
        assert_eq!(err.code(), ErrorCode::IoNotFound);
    }
}
