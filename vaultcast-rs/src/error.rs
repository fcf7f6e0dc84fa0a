//! Error types and exit codes for vaultcast.

use crate::remote::RemoteError;
use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes.
pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NOTE_NOT_FOUND: i32 = 2;
    pub const INVALID_FILE_KIND: i32 = 3;
    pub const REMOTE_ERROR: i32 = 4;
    pub const ABORTED: i32 = 5;
    pub const CONFIG_ERROR: i32 = 6;
}

/// Shown when the forum rejects our credentials.
pub const CREDENTIALS_HINT: &str = "The forum rejected the API credentials. Check api_key and \
     api_username in the config file, or the VAULTCAST_API_KEY and VAULTCAST_API_USERNAME \
     environment variables.";

/// Main error type for sync operations.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("Invalid file kind: {path} (expected a .{expected} file)")]
    InvalidFileKind { path: PathBuf, expected: String },

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("Local index error: {0}")]
    Persistence(#[from] rusqlite::Error),

    #[error("Processing error: {0}")]
    Processing(String),

    #[error("Vault not found at: {0}")]
    VaultNotFound(PathBuf),

    #[error("Note not found: {0}")]
    NoteNotFound(String),

    #[error("Invalid frontmatter in {path}: {message}")]
    InvalidFrontmatter { path: PathBuf, message: String },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Sync aborted by operator")]
    Aborted,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Glob pattern error: {0}")]
    GlobPattern(#[from] glob::PatternError),
}

impl SyncError {
    /// Returns the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            SyncError::NoteNotFound(_) => exit_code::NOTE_NOT_FOUND,
            SyncError::InvalidFileKind { .. } => exit_code::INVALID_FILE_KIND,
            SyncError::Remote(_) => exit_code::REMOTE_ERROR,
            SyncError::Aborted => exit_code::ABORTED,
            SyncError::Config(_) => exit_code::CONFIG_ERROR,
            _ => exit_code::GENERAL_ERROR,
        }
    }

    /// Whether the error came back from the forum.
    pub fn is_remote(&self) -> bool {
        matches!(self, SyncError::Remote(_))
    }

    /// Whether a vault sync should ask before moving on to the next note.
    ///
    /// Remote and index failures tend to repeat for every following note;
    /// local problems with one file do not.
    pub fn needs_confirmation(&self) -> bool {
        matches!(self, SyncError::Remote(_) | SyncError::Persistence(_))
    }

    /// Whether the forum rejected our credentials.
    pub fn is_unauthenticated(&self) -> bool {
        matches!(self, SyncError::Remote(RemoteError::Unauthenticated { .. }))
    }

    /// Follow-up advice printed under the error message, if any.
    pub fn hint(&self) -> Option<&'static str> {
        self.is_unauthenticated().then_some(CREDENTIALS_HINT)
    }
}

/// Result type alias for vaultcast operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    Success,
    GeneralError,
}

impl ExitCode {
    /// Convert to exit code integer.
    pub fn code(self) -> i32 {
        match self {
            ExitCode::Success => exit_code::SUCCESS,
            ExitCode::GeneralError => exit_code::GENERAL_ERROR,
        }
    }
}
