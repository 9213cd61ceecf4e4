//! Error types for pbxfix-edit.
//!
//! Exit codes:
//! - 2: the manifest does not exist (nothing was read or written)
//! - 1: any other failure (I/O at a given stage, bad match pattern)

use camino::Utf8PathBuf;
use std::fmt;
use thiserror::Error;

/// The step of a patch run at which an I/O failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoStage {
    /// Reading the manifest. Nothing has been written.
    Read,
    /// Writing the backup. The manifest is untouched.
    Backup,
    /// Replacing the manifest. The backup is complete and the manifest is intact.
    Write,
}

impl fmt::Display for IoStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            IoStage::Read => "read",
            IoStage::Backup => "backup",
            IoStage::Write => "write",
        })
    }
}

/// The top-level error type for pbxfix-edit operations.
#[derive(Debug, Error)]
pub enum PatchError {
    /// The manifest path does not exist.
    #[error("manifest not found: {path}")]
    NotFound { path: Utf8PathBuf },

    /// A read or write failed. `source` already names the file.
    #[error("{stage} failed: {source}")]
    Io {
        stage: IoStage,
        path: Utf8PathBuf,
        source: std::io::Error,
    },

    /// A match pattern could not be compiled from the configured file name.
    #[error("invalid match pattern: {0}")]
    Pattern(#[from] regex::Error),
}

impl PatchError {
    pub(crate) fn io(stage: IoStage, path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        PatchError::Io {
            stage,
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PatchError::NotFound { .. })
    }

    /// Returns the recommended exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            PatchError::NotFound { .. } => 2,
            PatchError::Io { .. } | PatchError::Pattern(_) => 1,
        }
    }
}

/// Result type alias using PatchError.
pub type PatchResult<T> = Result<T, PatchError>;
