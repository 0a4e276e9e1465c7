//! Error types for Go toolchain operations.
//!
//! Every failure is surfaced to the caller with enough context to explain
//! which step of the update failed. Nothing in this crate retries or recovers
//! locally; errors are categorized only to give the user appropriate feedback.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Result type alias for toolchain operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Categories of toolchain errors for user feedback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Transport failures and non-success HTTP statuses.
    Network,
    /// Malformed catalog JSON or unexpected `go version` output.
    Parse,
    /// Downloaded file does not match the published digest.
    Integrity,
    /// Tool, release or artifact not found.
    NotFound,
    /// An installation step failed.
    Install,
    /// Permission denied during a filesystem operation.
    Permission,
    /// Other/unknown errors.
    Other,
}

impl ErrorCategory {
    /// Get a user-friendly description of this error category.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Network => "Network connectivity issue",
            Self::Parse => "Unexpected data format",
            Self::Integrity => "Checksum mismatch",
            Self::NotFound => "Not found",
            Self::Install => "Installation failed",
            Self::Permission => "Permission denied",
            Self::Other => "Unexpected error",
        }
    }

    /// Get actionable advice for resolving this error category.
    #[must_use]
    pub fn advice(&self) -> &'static str {
        match self {
            Self::Network => "Check your internet connection and try again",
            Self::Parse => "The release catalog or the local go command changed format",
            Self::Integrity => "The download may be corrupted or tampered with, try again",
            Self::NotFound => "No release is published for this platform or version",
            Self::Install => "Check the installer output and your sudo/admin access",
            Self::Permission => "Check directory permissions or run with appropriate access",
            Self::Other => "Check the error details for more information",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Errors that can occur during toolchain operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The host platform has no Go equivalent.
    #[error("unsupported platform: {os}/{arch}")]
    UnsupportedPlatform {
        /// Operating system.
        os: String,
        /// CPU architecture.
        arch: String,
    },

    /// HTTP request failed (transport error or non-2xx status).
    #[error("HTTP request failed: {message}")]
    HttpError {
        /// Error message.
        message: String,
        /// HTTP status code if available.
        status: Option<u16>,
    },

    /// Transfer of an artifact body failed midway.
    #[error("download failed for {filename}: {message}")]
    DownloadFailed {
        /// Artifact being downloaded.
        filename: String,
        /// Error message.
        message: String,
    },

    /// Catalog response could not be decoded.
    #[error("invalid release catalog: {0}")]
    Parse(String),

    /// The catalog was fetched successfully but lists no releases.
    #[error("release catalog was fetched successfully but is empty")]
    EmptyCatalog,

    /// `go version` printed something other than `<name> version <version> <os>/<arch>`.
    #[error("unexpected output from '{command}' ({reason}): {output:?}")]
    UnexpectedOutput {
        /// Command that produced the output.
        command: String,
        /// What was wrong with it.
        reason: String,
        /// Raw output, kept for diagnostics.
        output: String,
    },

    /// Executable could not be started.
    #[error("tool not found: {0}")]
    ToolNotFound(String),

    /// Version not found in the catalog.
    #[error("version {0} not found in release catalog")]
    VersionNotFound(String),

    /// Downloaded file digest does not match the catalog.
    #[error(
        "checksum verification failed for {} (expected: {expected} | got: {actual})",
        .path.display()
    )]
    Integrity {
        /// Location of the downloaded file, left on disk.
        path: PathBuf,
        /// Digest published in the catalog.
        expected: String,
        /// Digest computed locally.
        actual: String,
    },

    /// The release has no artifact for this host.
    #[error("no {kind} artifact published for {os}/{arch}")]
    NoMatchingArtifact {
        /// Host operating system.
        os: String,
        /// Host architecture.
        arch: String,
        /// Required artifact kind.
        kind: String,
    },

    /// Installer file has an extension we do not know how to run.
    #[error(
        "no suitable method was found for running the installer {} - expected an .msi or .pkg file",
        .0.display()
    )]
    UnsupportedInstaller(PathBuf),

    /// Archive artifact is not a gzipped tarball.
    #[error("{} doesn't seem to be a tarball - expected a .tar.gz file", .0.display())]
    NotATarball(PathBuf),

    /// A required external tool is not on PATH.
    #[error("could not locate '{0}' in PATH, which is required for this installation")]
    MissingTool(String),

    /// External command exited with a non-success status.
    #[error(
        "'{command}' exited with a non-success code ({})",
        .status.map_or_else(|| "signal".to_string(), |c| c.to_string())
    )]
    CommandFailed {
        /// Command line that was run.
        command: String,
        /// Exit code, `None` when killed by a signal.
        status: Option<i32>,
        /// Combined stdout/stderr.
        output: String,
    },

    /// IO error during file operations.
    #[error("IO error at {path}: {source}")]
    Io {
        /// Path involved in the error.
        path: PathBuf,
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },

    /// Configuration values cannot work together.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create an IO error with path context.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create an HTTP error.
    pub fn http(message: impl Into<String>, status: Option<u16>) -> Self {
        Self::HttpError {
            message: message.into(),
            status,
        }
    }

    /// Get the error category for user feedback.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::UnsupportedPlatform { .. } => ErrorCategory::NotFound,
            Error::HttpError { .. } => ErrorCategory::Network,
            Error::DownloadFailed { .. } => ErrorCategory::Network,
            Error::Parse(_) => ErrorCategory::Parse,
            Error::EmptyCatalog => ErrorCategory::Parse,
            Error::UnexpectedOutput { .. } => ErrorCategory::Parse,
            Error::ToolNotFound(_) => ErrorCategory::NotFound,
            Error::VersionNotFound(_) => ErrorCategory::NotFound,
            Error::Integrity { .. } => ErrorCategory::Integrity,
            Error::NoMatchingArtifact { .. } => ErrorCategory::NotFound,
            Error::UnsupportedInstaller(_) => ErrorCategory::Install,
            Error::NotATarball(_) => ErrorCategory::Install,
            Error::MissingTool(_) => ErrorCategory::Install,
            Error::CommandFailed { .. } => ErrorCategory::Install,
            Error::Io { source, .. } => {
                if source.kind() == io::ErrorKind::PermissionDenied {
                    ErrorCategory::Permission
                } else {
                    ErrorCategory::Other
                }
            }
            Error::InvalidConfig(_) => ErrorCategory::Other,
        }
    }
}

impl From<ureq::Error> for Error {
    fn from(err: ureq::Error) -> Self {
        match err {
            ureq::Error::StatusCode(code) => Self::HttpError {
                message: format!("HTTP {}", code),
                status: Some(code),
            },
            other => Self::HttpError {
                message: other.to_string(),
                status: None,
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
