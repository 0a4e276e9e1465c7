//! Installing a release on the current host.
//!
//! The artifact is chosen by host platform (installer packages on Windows
//! and macOS, archives everywhere else), downloaded and verified, then handed
//! to the method matching its file name. The downloaded file is removed
//! afterwards whether or not the install worked.

use crate::backend::Backend;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fetch::{DownloadProgress, Fetcher, NoProgress};
use crate::privilege::{Privileged, PrivilegedCommand};
use crate::runner::CommandRunner;
use crate::types::{Artifact, ArtifactKind, InstallMethod, InstallReport, Platform, Release};
use std::fs;
use std::path::Path;

/// Installs releases for one host.
pub struct Installer<'a> {
    backend: &'a dyn Backend,
    runner: &'a dyn CommandRunner,
    privileged: &'a dyn Privileged,
    config: &'a Config,
    platform: &'a Platform,
    progress: &'a dyn DownloadProgress,
}

impl<'a> Installer<'a> {
    /// Create an installer.
    #[must_use]
    pub fn new(
        backend: &'a dyn Backend,
        runner: &'a dyn CommandRunner,
        privileged: &'a dyn Privileged,
        config: &'a Config,
        platform: &'a Platform,
    ) -> Self {
        Self {
            backend,
            runner,
            privileged,
            config,
            platform,
            progress: &NoProgress,
        }
    }

    /// Report download progress to `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: &'a dyn DownloadProgress) -> Self {
        self.progress = progress;
        self
    }

    /// Pick the artifact of `release` this host needs.
    ///
    /// # Errors
    ///
    /// Returns `Error::NoMatchingArtifact` if the release has none.
    pub fn select<'r>(&self, release: &'r Release) -> Result<&'r Artifact> {
        let kind = self.platform.required_kind();
        release
            .find_artifact(&self.platform.os, &self.platform.arch, kind)
            .ok_or_else(|| Error::NoMatchingArtifact {
                os: self.platform.os.clone(),
                arch: self.platform.arch.clone(),
                kind: kind.to_string(),
            })
    }

    /// Download, verify and install `release`.
    ///
    /// # Errors
    ///
    /// - `Error::NoMatchingArtifact` before anything is downloaded
    /// - any download or `Error::Integrity` error from the fetch step
    /// - `Error::UnsupportedInstaller`, `Error::NotATarball`,
    ///   `Error::MissingTool` or `Error::CommandFailed` from the install step
    /// - `Error::Io` if the existing install directory cannot be checked
    pub fn install(&self, release: &Release) -> Result<InstallReport> {
        let artifact = self.select(release)?;
        log::info!(
            "installing {} from {} ({} bytes)",
            release.version,
            artifact.filename,
            artifact.size
        );

        let path = Fetcher::new(self.backend, &self.config.download_dir)
            .with_progress(self.progress)
            .download_sized(&artifact.filename, &artifact.sha256, Some(artifact.size))
            .inspect_err(|_| {
                let partial = self.config.download_path(&artifact.filename);
                if partial.exists() {
                    cleanup(&partial);
                }
            })?;

        let outcome = self.dispatch(artifact.kind, &path);
        let cleanup_warning = cleanup(&path);
        let method = outcome?;

        let path_hint = match method {
            InstallMethod::Tarball => Some(self.config.install_dir.join("bin")),
            InstallMethod::Msi | InstallMethod::Pkg => None,
        };

        Ok(InstallReport {
            version: release.version.clone(),
            filename: artifact.filename.clone(),
            method,
            path_hint,
            cleanup_warning,
        })
    }

    fn dispatch(&self, kind: ArtifactKind, path: &Path) -> Result<InstallMethod> {
        match kind {
            ArtifactKind::Installer => self.run_installer(path),
            ArtifactKind::Archive => self.extract_tarball(path).map(|()| InstallMethod::Tarball),
            ArtifactKind::Source => Err(Error::NotATarball(path.to_path_buf())),
        }
    }

    fn run_installer(&self, path: &Path) -> Result<InstallMethod> {
        let name = file_name(path);
        let (method, command) = if name.ends_with(".msi") {
            (InstallMethod::Msi, PrivilegedCommand::msi_install(path))
        } else if name.ends_with(".pkg") {
            (InstallMethod::Pkg, PrivilegedCommand::pkg_install(path))
        } else {
            return Err(Error::UnsupportedInstaller(path.to_path_buf()));
        };

        self.execute(&command)?;
        Ok(method)
    }

    fn extract_tarball(&self, path: &Path) -> Result<()> {
        if !file_name(path).ends_with(".tar.gz") {
            return Err(Error::NotATarball(path.to_path_buf()));
        }
        if self.runner.resolve("tar").is_none() {
            return Err(Error::MissingTool("tar".to_string()));
        }

        let install_dir = &self.config.install_dir;
        let dest = self.config.extract_dir()?;

        // An unreadable location must not be mistaken for a missing one.
        let exists = install_dir
            .try_exists()
            .map_err(|e| Error::io(install_dir, e))?;
        if exists {
            log::info!("removing previous installation at {}", install_dir.display());
            self.execute(&PrivilegedCommand::remove_tree(install_dir))?;
        }

        self.execute(&PrivilegedCommand::extract(path, dest))
    }

    fn execute(&self, command: &PrivilegedCommand) -> Result<()> {
        self.privileged.execute(command)?.check(&command.line())?;
        Ok(())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Remove a downloaded file, returning a warning instead of failing.
fn cleanup(path: &Path) -> Option<String> {
    match fs::remove_file(path) {
        Ok(()) => {
            log::debug!("removed {}", path.display());
            None
        }
        Err(e) => {
            let warning = format!("failed to remove {}: {e}", path.display());
            log::warn!("{warning}");
            Some(warning)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::MockBackend;
    use crate::privilege::DryRun;
    use crate::runner::{CommandOutput, MockRunner};
    use tempfile::TempDir;

    const DATA: &[u8] = b"Hello, World!";
    const DATA_SHA256: &str = "dffd6021bb2bd5b0af676290809ec3a53191dd81c7f70a4b28688a362182986f";

    struct Fixture {
        dir: TempDir,
        config: Config,
        backend: MockBackend,
        runner: MockRunner,
        privileged: DryRun,
    }

    impl Fixture {
        fn new() -> Self {
            let dir = TempDir::new().unwrap();
            let config = Config::new()
                .download_dir(dir.path().join(".tmp"))
                .install_dir(dir.path().join("local").join("go"));
            Self {
                dir,
                config,
                backend: MockBackend::new(),
                runner: MockRunner::new().with_program("tar", "/usr/bin/tar"),
                privileged: DryRun::new(),
            }
        }

        fn serve(&mut self, filename: &str, data: &[u8]) {
            self.backend.add_artifact(filename, data.to_vec());
        }

        fn install(&self, platform: &Platform, release: &Release) -> Result<InstallReport> {
            Installer::new(
                &self.backend,
                &self.runner,
                &self.privileged,
                &self.config,
                platform,
            )
            .install(release)
        }

        fn issued(&self) -> Vec<String> {
            self.privileged.issued().iter().map(|i| i.line()).collect()
        }
    }

    fn artifact(filename: &str, os: &str, arch: &str, kind: ArtifactKind) -> Artifact {
        Artifact {
            filename: filename.to_string(),
            os: os.to_string(),
            arch: arch.to_string(),
            version: "go1.21.0".to_string(),
            sha256: DATA_SHA256.to_string(),
            size: DATA.len() as u64,
            kind,
        }
    }

    fn release() -> Release {
        Release {
            version: "go1.21.0".to_string(),
            stable: true,
            files: vec![
                artifact("go1.21.0.src.tar.gz", "", "", ArtifactKind::Source),
                artifact("go1.21.0.darwin-arm64.tar.gz", "darwin", "arm64", ArtifactKind::Archive),
                artifact("go1.21.0.darwin-arm64.pkg", "darwin", "arm64", ArtifactKind::Installer),
                artifact("go1.21.0.linux-amd64.tar.gz", "linux", "amd64", ArtifactKind::Archive),
                artifact("go1.21.0.windows-amd64.zip", "windows", "amd64", ArtifactKind::Archive),
                artifact("go1.21.0.windows-amd64.msi", "windows", "amd64", ArtifactKind::Installer),
            ],
        }
    }

    #[test]
    fn test_select_by_platform() {
        let fixture = Fixture::new();
        let release = release();

        let cases = [
            (Platform::new("darwin", "arm64"), "go1.21.0.darwin-arm64.pkg"),
            (Platform::new("windows", "amd64"), "go1.21.0.windows-amd64.msi"),
            (Platform::new("linux", "amd64"), "go1.21.0.linux-amd64.tar.gz"),
        ];
        for (platform, expected) in cases {
            let installer = Installer::new(
                &fixture.backend,
                &fixture.runner,
                &fixture.privileged,
                &fixture.config,
                &platform,
            );
            assert_eq!(installer.select(&release).unwrap().filename, expected);
        }
    }

    #[test]
    fn test_no_matching_artifact_downloads_nothing() {
        let fixture = Fixture::new();
        let platform = Platform::new("linux", "riscv64");

        match fixture.install(&platform, &release()) {
            Err(Error::NoMatchingArtifact { os, arch, kind }) => {
                assert_eq!(os, "linux");
                assert_eq!(arch, "riscv64");
                assert_eq!(kind, "archive");
            }
            other => panic!("Expected NoMatchingArtifact, got {other:?}"),
        }
        assert!(fixture.backend.downloads().is_empty());
        assert!(fixture.issued().is_empty());
    }

    #[test]
    fn test_install_pkg() {
        let mut fixture = Fixture::new();
        fixture.serve("go1.21.0.darwin-arm64.pkg", DATA);
        let platform = Platform::new("darwin", "arm64");

        let report = fixture.install(&platform, &release()).unwrap();
        assert_eq!(report.method, InstallMethod::Pkg);
        assert_eq!(report.filename, "go1.21.0.darwin-arm64.pkg");
        assert!(report.path_hint.is_none());
        assert!(report.cleanup_warning.is_none());

        let issued = fixture.privileged.issued();
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].program, "installer");
        assert_eq!(issued[0].args[0], "-pkg");
        assert!(issued[0].args[1].ends_with("go1.21.0.darwin-arm64.pkg"));

        // Temp file gone after a successful install.
        assert!(!fixture.config.download_path("go1.21.0.darwin-arm64.pkg").exists());
    }

    #[test]
    fn test_install_msi() {
        let mut fixture = Fixture::new();
        fixture.serve("go1.21.0.windows-amd64.msi", DATA);
        let platform = Platform::new("windows", "amd64");

        let report = fixture.install(&platform, &release()).unwrap();
        assert_eq!(report.method, InstallMethod::Msi);

        let issued = fixture.privileged.issued();
        assert_eq!(issued[0].program, "msiexec");
        assert_eq!(issued[0].args[0], "/package");
        assert_eq!(issued[0].args[2], "/passive");
    }

    #[test]
    fn test_install_tarball_fresh() {
        let mut fixture = Fixture::new();
        fixture.serve("go1.21.0.linux-amd64.tar.gz", DATA);
        let platform = Platform::new("linux", "amd64");

        let report = fixture.install(&platform, &release()).unwrap();
        assert_eq!(report.method, InstallMethod::Tarball);
        assert_eq!(
            report.path_hint,
            Some(fixture.config.install_dir.join("bin"))
        );

        // Nothing to remove, so only the extraction runs.
        let issued = fixture.privileged.issued();
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].program, "tar");
        assert_eq!(issued[0].args[0], "-C");
        assert_eq!(
            issued[0].args[1],
            fixture.config.extract_dir().unwrap().to_string_lossy()
        );
        assert_eq!(issued[0].args[2], "-xzf");
    }

    #[test]
    fn test_install_tarball_replaces_existing_tree() {
        let mut fixture = Fixture::new();
        fixture.serve("go1.21.0.linux-amd64.tar.gz", DATA);
        fs::create_dir_all(fixture.config.install_dir.join("bin")).unwrap();
        let platform = Platform::new("linux", "amd64");

        fixture.install(&platform, &release()).unwrap();

        let issued = fixture.privileged.issued();
        assert_eq!(issued.len(), 2);
        assert_eq!(issued[0].program, "rm");
        assert_eq!(
            issued[0].args,
            vec![
                "-rf".to_string(),
                fixture.config.install_dir.to_string_lossy().into_owned()
            ]
        );
        assert_eq!(issued[1].program, "tar");
    }

    #[cfg(unix)]
    #[test]
    fn test_install_tarball_unreadable_install_dir_fails_closed() {
        let mut fixture = Fixture::new();
        fixture.serve("go1.21.0.linux-amd64.tar.gz", DATA);
        // A regular file where a directory is expected makes the lookup
        // fail with ENOTDIR rather than NotFound, even as root.
        let blocker = fixture.dir.path().join("blocker");
        fs::write(&blocker, b"").unwrap();
        fixture.config = fixture.config.clone().install_dir(blocker.join("go"));
        let platform = Platform::new("linux", "amd64");

        let result = fixture.install(&platform, &release());
        match result {
            Err(Error::Io { path, .. }) => assert_eq!(path, blocker.join("go")),
            other => panic!("Expected Io error, got {other:?}"),
        }
        assert!(fixture.issued().is_empty());
        assert!(!fixture.config.download_path("go1.21.0.linux-amd64.tar.gz").exists());
    }

    #[test]
    fn test_install_tarball_requires_tar() {
        let mut fixture = Fixture::new();
        fixture.runner = MockRunner::new();
        fixture.serve("go1.21.0.linux-amd64.tar.gz", DATA);
        let platform = Platform::new("linux", "amd64");

        let result = fixture.install(&platform, &release());
        assert!(matches!(result, Err(Error::MissingTool(ref tool)) if tool == "tar"));
        assert!(fixture.issued().is_empty());
        assert!(!fixture.config.download_path("go1.21.0.linux-amd64.tar.gz").exists());
    }

    #[test]
    fn test_install_archive_that_is_not_a_tarball() {
        let mut fixture = Fixture::new();
        fixture.serve("go1.21.0.windows-amd64.zip", DATA);
        // A windows host resolved to archives only happens with a custom
        // catalog, so drive the dispatch directly.
        let platform = Platform::new("windows", "amd64");
        let installer = Installer::new(
            &fixture.backend,
            &fixture.runner,
            &fixture.privileged,
            &fixture.config,
            &platform,
        );

        let path = Path::new("go1.21.0.windows-amd64.zip");
        let result = installer.dispatch(ArtifactKind::Archive, path);
        assert!(matches!(result, Err(Error::NotATarball(_))));
    }

    #[test]
    fn test_install_unknown_installer_extension() {
        let mut fixture = Fixture::new();
        let mut release = release();
        release.files = vec![artifact(
            "go1.21.0.darwin-arm64.dmg",
            "darwin",
            "arm64",
            ArtifactKind::Installer,
        )];
        fixture.serve("go1.21.0.darwin-arm64.dmg", DATA);
        let platform = Platform::new("darwin", "arm64");

        let result = fixture.install(&platform, &release);
        assert!(matches!(result, Err(Error::UnsupportedInstaller(_))));
        assert!(fixture.issued().is_empty());
        assert!(!fixture.config.download_path("go1.21.0.darwin-arm64.dmg").exists());
    }

    #[test]
    fn test_integrity_failure_removes_download() {
        let mut fixture = Fixture::new();
        fixture.serve("go1.21.0.linux-amd64.tar.gz", b"Hello, World?");
        let platform = Platform::new("linux", "amd64");

        let result = fixture.install(&platform, &release());
        assert!(matches!(result, Err(Error::Integrity { .. })));
        assert!(fixture.issued().is_empty());
        assert!(!fixture.config.download_path("go1.21.0.linux-amd64.tar.gz").exists());
    }

    #[test]
    fn test_failed_install_command_still_cleans_up() {
        struct Refusing;

        impl Privileged for Refusing {
            fn execute(&self, _command: &PrivilegedCommand) -> Result<CommandOutput> {
                Ok(CommandOutput::failed(1, "sudo: a password is required"))
            }
        }

        let mut fixture = Fixture::new();
        fixture.serve("go1.21.0.darwin-arm64.pkg", DATA);
        let platform = Platform::new("darwin", "arm64");

        let result = Installer::new(
            &fixture.backend,
            &fixture.runner,
            &Refusing,
            &fixture.config,
            &platform,
        )
        .install(&release());

        match result {
            Err(Error::CommandFailed { command, status, output }) => {
                assert!(command.contains("installer -pkg"));
                assert_eq!(status, Some(1));
                assert!(output.contains("password"));
            }
            other => panic!("Expected CommandFailed, got {other:?}"),
        }
        assert!(!fixture.config.download_path("go1.21.0.darwin-arm64.pkg").exists());
    }

    #[test]
    fn test_cleanup_missing_file_warns() {
        let dir = TempDir::new().unwrap();
        let warning = cleanup(&dir.path().join("never-downloaded.tar.gz"));
        assert!(warning.unwrap().contains("never-downloaded.tar.gz"));
    }
}
