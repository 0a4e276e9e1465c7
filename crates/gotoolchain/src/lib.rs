//! # gotoolchain
//!
//! Keep the local Go toolchain in step with the latest published release.
//!
//! This crate provides functionality for:
//! - Reading the official release catalog (`https://go.dev/dl/?mode=json`)
//! - Asking the local `go` which version and platform it is
//! - Downloading the right artifact for this host and checking its SHA-256
//! - Installing it with `msiexec`, `installer` or `tar`, depending on the host
//!
//! ## Example
//!
//! ```no_run
//! use gotoolchain::{Config, UpdateStatus, Updater};
//!
//! let updater = Updater::new(Config::default()).expect("unsupported platform");
//!
//! match updater.check().expect("check failed") {
//!     UpdateStatus::UpToDate { local } => println!("{} is current", local.version),
//!     status => {
//!         let release = status.target().expect("outdated").clone();
//!         let report = updater.install(&release).expect("install failed");
//!         println!("{report}");
//!     }
//! }
//! ```
//!
//! ## Artifact selection
//!
//! | Host    | Artifact kind | Installed with                      |
//! |---------|---------------|-------------------------------------|
//! | Windows | installer     | `msiexec /package <file> /passive`  |
//! | macOS   | installer     | `sudo installer -pkg <file> -target /` |
//! | other   | archive       | `sudo tar -C <parent> -xzf <file>`  |
//!
//! ## Testing
//!
//! Every side effect sits behind a trait: [`backend::Backend`] for HTTP,
//! [`runner::CommandRunner`] for subprocesses and [`privilege::Privileged`]
//! for elevated commands. [`Updater::with_parts`] accepts mocks for all
//! three.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod backend;
pub mod config;
pub mod error;
pub mod fetch;
pub mod install;
pub mod local;
pub mod platform;
pub mod privilege;
pub mod runner;
pub mod types;

pub use config::Config;
pub use error::{Error, ErrorCategory, Result};
pub use fetch::DownloadProgress;
pub use types::{
    Artifact, ArtifactKind, Catalog, InstallMethod, InstallReport, LocalVersionInfo, Platform,
    Release, UpdateStatus,
};

use backend::Backend;
pub use backend::MockBackend;
use backend::http::HttpBackend;
use fetch::NoProgress;
use install::Installer;
use local::Inspector;
use privilege::{DryRun, Privileged, Sudo};
use runner::{CommandRunner, SystemRunner};

/// Checks for and installs Go releases on the current host.
///
/// # Example
///
/// ```no_run
/// use gotoolchain::{Config, Updater};
///
/// let updater = Updater::new(Config::default()).unwrap();
/// let latest = updater.latest().unwrap();
/// println!("latest release: {}", latest.version);
/// ```
pub struct Updater {
    config: Config,
    backend: Box<dyn Backend>,
    runner: Box<dyn CommandRunner>,
    privileged: Box<dyn Privileged>,
    platform: Platform,
}

impl Updater {
    /// Create an updater talking to the configured servers and running
    /// commands on this host.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnsupportedPlatform` if the host cannot be mapped to
    /// a Go platform.
    pub fn new(config: Config) -> Result<Self> {
        let platform = platform::detect()?;
        let backend = Box::new(HttpBackend::new(&config));
        Ok(Self::with_parts(
            config,
            backend,
            Box::new(SystemRunner::new()),
            Box::new(Sudo::new(Box::new(SystemRunner::new()))),
            platform,
        ))
    }

    /// Create an updater from explicit parts (useful for testing).
    #[must_use]
    pub fn with_parts(
        config: Config,
        backend: Box<dyn Backend>,
        runner: Box<dyn CommandRunner>,
        privileged: Box<dyn Privileged>,
        platform: Platform,
    ) -> Self {
        Self {
            config,
            backend,
            runner,
            privileged,
            platform,
        }
    }

    /// Record privileged commands instead of running them.
    #[must_use]
    pub fn dry_run(mut self) -> Self {
        self.privileged = Box::new(DryRun::new());
        self
    }

    /// Whether privileged commands are only being recorded.
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.privileged.is_dry_run()
    }

    /// The host platform artifacts are selected for.
    #[must_use]
    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    // =========================================================================
    // Release Information
    // =========================================================================

    /// Fetch the full release catalog, newest first.
    ///
    /// # Errors
    ///
    /// Returns `Error::HttpError` or `Error::Parse`.
    pub fn catalog(&self) -> Result<Catalog> {
        self.backend.fetch_catalog()
    }

    /// List published releases, newest first.
    ///
    /// # Errors
    ///
    /// As [`Updater::catalog`].
    pub fn releases(&self) -> Result<Vec<Release>> {
        Ok(self.catalog()?.releases().to_vec())
    }

    /// The most recent published release.
    ///
    /// # Errors
    ///
    /// As [`Updater::catalog`], plus `Error::EmptyCatalog`.
    pub fn latest(&self) -> Result<Release> {
        self.catalog()?.most_recent().cloned()
    }

    /// Look up a release by version string, e.g. `go1.21.0`.
    ///
    /// # Errors
    ///
    /// As [`Updater::catalog`], plus `Error::VersionNotFound`.
    pub fn release(&self, version: &str) -> Result<Release> {
        self.catalog()?
            .find(version)
            .cloned()
            .ok_or_else(|| Error::VersionNotFound(version.to_string()))
    }

    // =========================================================================
    // Local Toolchain
    // =========================================================================

    fn inspector(&self) -> Inspector<'_> {
        Inspector::new(self.runner.as_ref(), &self.config.binary_name)
    }

    /// Whether `go` is on PATH.
    #[must_use]
    pub fn is_installed(&self) -> bool {
        self.inspector().is_available()
    }

    /// Where `go` resolves on PATH.
    #[must_use]
    pub fn local_path(&self) -> Option<std::path::PathBuf> {
        self.inspector().locate()
    }

    /// Version and platform reported by the local `go`.
    ///
    /// # Errors
    ///
    /// See [`Inspector::inspect`].
    pub fn local_version(&self) -> Result<LocalVersionInfo> {
        self.inspector().inspect()
    }

    /// Compare the local toolchain with the most recent release.
    ///
    /// The catalog is fetched first. The local `go` is only run when it is
    /// on PATH; versions are compared as plain strings.
    ///
    /// # Errors
    ///
    /// Catalog errors, plus anything [`Inspector::inspect`] returns.
    pub fn check(&self) -> Result<UpdateStatus> {
        let latest = self.latest()?;
        let inspector = self.inspector();

        if !inspector.is_available() {
            log::debug!("{} not found in PATH", self.config.binary_name);
            return Ok(UpdateStatus::NotInstalled { latest });
        }

        let local = inspector.inspect()?;
        if local.version == latest.version {
            Ok(UpdateStatus::UpToDate { local })
        } else {
            Ok(UpdateStatus::Outdated { local, latest })
        }
    }

    // =========================================================================
    // Installation
    // =========================================================================

    fn installer(&self) -> Installer<'_> {
        Installer::new(
            self.backend.as_ref(),
            self.runner.as_ref(),
            self.privileged.as_ref(),
            &self.config,
            &self.platform,
        )
    }

    /// The artifact of `release` that would be installed on this host.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoMatchingArtifact` if there is none.
    pub fn artifact<'r>(&self, release: &'r Release) -> Result<&'r Artifact> {
        self.installer().select(release)
    }

    /// Download, verify and install `release` for this host.
    ///
    /// # Errors
    ///
    /// See [`Installer::install`].
    pub fn install(&self, release: &Release) -> Result<InstallReport> {
        self.install_with_progress(release, &NoProgress)
    }

    /// Like [`Updater::install`], reporting download progress.
    ///
    /// # Errors
    ///
    /// See [`Installer::install`].
    pub fn install_with_progress(
        &self,
        release: &Release,
        progress: &dyn DownloadProgress,
    ) -> Result<InstallReport> {
        self.installer().with_progress(progress).install(release)
    }

    /// Check, then install the latest release if needed.
    ///
    /// Returns the status and, when something was installed, its report.
    ///
    /// # Errors
    ///
    /// Anything [`Updater::check`] or [`Updater::install`] returns.
    pub fn update(&self) -> Result<(UpdateStatus, Option<InstallReport>)> {
        let status = self.check()?;
        let report = match status.target() {
            Some(release) => Some(self.install(release)?),
            None => None,
        };
        Ok((status, report))
    }
}
