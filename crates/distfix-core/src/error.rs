use std::path::PathBuf;
use thiserror::Error;

/// Stable error codes, SCREAMING_SNAKE_CASE.
pub mod codes {
    pub const MANIFEST_MISSING: &str = "MANIFEST_MISSING";
    pub const MANIFEST_UNREADABLE: &str = "MANIFEST_UNREADABLE";
    pub const ENTRY_POINT_MISSING: &str = "ENTRY_POINT_MISSING";
    pub const OUTPUT_DIR_MISSING: &str = "OUTPUT_DIR_MISSING";
    pub const CONTENT_UNREADABLE: &str = "CONTENT_UNREADABLE";
    pub const WRITE_FAILED: &str = "WRITE_FAILED";
}

/// Core error type for distfix operations.
#[derive(Error, Debug)]
pub enum Error {
    #[error("package.json not found at {path}, are you at the package root?")]
    ManifestMissing { path: PathBuf },

    #[error("Failed to parse package.json at {path}: {reason}")]
    ManifestUnreadable { path: PathBuf, reason: String },

    #[error("Entry point not found in {path}, set one of \"exports\", \"main\" or \"bin\"")]
    EntryPointMissing { path: PathBuf },

    #[error("Output directory not found: {path}")]
    OutputDirMissing { path: PathBuf },

    #[error("Failed to read {path}: {source}")]
    ContentUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Stable code for this error.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::ManifestMissing { .. } => codes::MANIFEST_MISSING,
            Self::ManifestUnreadable { .. } => codes::MANIFEST_UNREADABLE,
            Self::EntryPointMissing { .. } => codes::ENTRY_POINT_MISSING,
            Self::OutputDirMissing { .. } => codes::OUTPUT_DIR_MISSING,
            Self::ContentUnreadable { .. } => codes::CONTENT_UNREADABLE,
            Self::Write { .. } => codes::WRITE_FAILED,
        }
    }

    /// Whether the error means "nothing to transform yet" rather than a broken build.
    ///
    /// A pass that fails with a soft error is reported as skipped.
    #[must_use]
    pub fn is_soft(&self) -> bool {
        matches!(
            self,
            Self::OutputDirMissing { .. } | Self::ContentUnreadable { .. }
        )
    }
}
