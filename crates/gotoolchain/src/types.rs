//! Core types for Go toolchain management.
//!
//! This module contains the data model shared by the rest of the crate:
//! the release catalog as published by the Go download server, the host
//! platform in Go naming, the locally installed version and the outcomes
//! of checking and installing.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;

/// Kind of a downloadable release file.
///
/// # Example
///
/// ```
/// use gotoolchain::ArtifactKind;
///
/// let kind: ArtifactKind = serde_json::from_str("\"archive\"").unwrap();
/// assert_eq!(kind, ArtifactKind::Archive);
/// assert_eq!(kind.as_str(), "archive");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    /// Graphical installer package (`.msi`, `.pkg`).
    Installer,
    /// Binary distribution tarball or zip.
    Archive,
    /// Source tarball.
    Source,
}

impl ArtifactKind {
    /// The tag used for this kind in the catalog.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Installer => "installer",
            Self::Archive => "archive",
            Self::Source => "source",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operating system and architecture, using Go's `GOOS`/`GOARCH` names.
///
/// # Example
///
/// ```
/// use gotoolchain::{ArtifactKind, Platform};
///
/// let platform = Platform::new("darwin", "arm64");
/// assert_eq!(platform.to_string(), "darwin/arm64");
/// assert_eq!(platform.required_kind(), ArtifactKind::Installer);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Platform {
    /// Operating system (e.g., "linux", "darwin", "windows").
    pub os: String,
    /// CPU architecture (e.g., "amd64", "arm64").
    pub arch: String,
}

impl Platform {
    /// Create a new platform.
    #[must_use]
    pub fn new(os: impl Into<String>, arch: impl Into<String>) -> Self {
        Self {
            os: os.into(),
            arch: arch.into(),
        }
    }

    /// Check if this platform is macOS.
    #[must_use]
    pub fn is_darwin(&self) -> bool {
        self.os == "darwin"
    }

    /// Check if this platform is Windows.
    #[must_use]
    pub fn is_windows(&self) -> bool {
        self.os == "windows"
    }

    /// The artifact kind used to install Go on this platform.
    ///
    /// Windows and macOS get the graphical installer package, everything
    /// else gets the binary tarball.
    #[must_use]
    pub fn required_kind(&self) -> ArtifactKind {
        if self.is_windows() || self.is_darwin() {
            ArtifactKind::Installer
        } else {
            ArtifactKind::Archive
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// A downloadable file belonging to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    /// File name, unique within a release (e.g., "go1.21.0.linux-amd64.tar.gz").
    pub filename: String,
    /// Target operating system; empty for source archives.
    pub os: String,
    /// Target architecture; empty for source archives.
    pub arch: String,
    /// Release version this file belongs to.
    pub version: String,
    /// Hex-encoded SHA-256 digest of the file.
    pub sha256: String,
    /// Size in bytes.
    pub size: u64,
    /// Kind of file.
    pub kind: ArtifactKind,
}

impl Artifact {
    /// Whether this artifact targets the given platform with the given kind.
    #[must_use]
    pub fn matches(&self, os: &str, arch: &str, kind: ArtifactKind) -> bool {
        self.os == os && self.arch == arch && self.kind == kind
    }
}

/// A published Go release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    /// Version identifier (e.g., "go1.21.0").
    pub version: String,
    /// Whether this is a stable release.
    pub stable: bool,
    /// Downloadable files.
    pub files: Vec<Artifact>,
}

impl Release {
    /// Find the artifact for a platform and kind.
    ///
    /// Returns the first match; the catalog is expected to hold at most one.
    #[must_use]
    pub fn find_artifact(&self, os: &str, arch: &str, kind: ArtifactKind) -> Option<&Artifact> {
        self.files.iter().find(|f| f.matches(os, arch, kind))
    }

    /// Distinct platforms this release ships binaries for.
    #[must_use]
    pub fn platform_pairs(&self) -> BTreeSet<Platform> {
        self.files
            .iter()
            .filter(|f| f.kind != ArtifactKind::Source)
            .map(|f| Platform::new(&f.os, &f.arch))
            .collect()
    }
}

/// The list of releases published by the download server, newest first.
///
/// The order is trusted as received; nothing is re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog(Vec<Release>);

impl Catalog {
    /// Wrap a list of releases, keeping their order.
    #[must_use]
    pub fn new(releases: Vec<Release>) -> Self {
        Self(releases)
    }

    /// The most recent release (the first entry).
    ///
    /// # Errors
    ///
    /// Returns `Error::EmptyCatalog` if there are no releases.
    pub fn most_recent(&self) -> Result<&Release> {
        self.0.first().ok_or(Error::EmptyCatalog)
    }

    /// Find a release by its version identifier.
    #[must_use]
    pub fn find(&self, version: &str) -> Option<&Release> {
        self.0.iter().find(|r| r.version == version)
    }

    /// Iterate over stable releases only.
    pub fn stable(&self) -> impl Iterator<Item = &Release> {
        self.0.iter().filter(|r| r.stable)
    }

    /// All releases in catalog order.
    #[must_use]
    pub fn releases(&self) -> &[Release] {
        &self.0
    }

    /// Number of releases.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the catalog holds no releases.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Release>> for Catalog {
    fn from(releases: Vec<Release>) -> Self {
        Self(releases)
    }
}

/// Version and platform reported by a local `go version`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalVersionInfo {
    /// Version identifier (e.g., "go1.20.3").
    pub version: String,
    /// Operating system the local toolchain targets.
    pub os: String,
    /// Architecture the local toolchain targets.
    pub arch: String,
}

impl LocalVersionInfo {
    /// The platform the local toolchain was built for.
    #[must_use]
    pub fn platform(&self) -> Platform {
        Platform::new(&self.os, &self.arch)
    }
}

/// Result of comparing the local toolchain against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateStatus {
    /// No toolchain on PATH.
    NotInstalled {
        /// Most recent published release.
        latest: Release,
    },
    /// The local version equals the most recent release.
    UpToDate {
        /// Local toolchain information.
        local: LocalVersionInfo,
    },
    /// A newer (or at least different) release is published.
    Outdated {
        /// Local toolchain information.
        local: LocalVersionInfo,
        /// Most recent published release.
        latest: Release,
    },
}

impl UpdateStatus {
    /// The release to install, if an install is needed.
    #[must_use]
    pub fn target(&self) -> Option<&Release> {
        match self {
            Self::NotInstalled { latest } | Self::Outdated { latest, .. } => Some(latest),
            Self::UpToDate { .. } => None,
        }
    }
}

/// How an artifact gets installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallMethod {
    /// Windows Installer package run through `msiexec`.
    Msi,
    /// macOS package run through `installer`.
    Pkg,
    /// Tarball extracted over the system install location.
    Tarball,
}

impl fmt::Display for InstallMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Msi => write!(f, "msi installer"),
            Self::Pkg => write!(f, "pkg installer"),
            Self::Tarball => write!(f, "tarball"),
        }
    }
}

/// Result of an installation.
#[derive(Debug, Clone)]
pub struct InstallReport {
    /// The version that was installed.
    pub version: String,
    /// The artifact that was installed.
    pub filename: String,
    /// How it was installed.
    pub method: InstallMethod,
    /// Directory that must be on PATH, for installs that do not set it up.
    pub path_hint: Option<PathBuf>,
    /// Set when the downloaded file could not be removed afterwards.
    pub cleanup_warning: Option<String>,
}

impl fmt::Display for InstallReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} installed from {} via {}",
            self.version, self.filename, self.method
        )
    }
}
