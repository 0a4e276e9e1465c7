//! Default command: install Go, or upgrade it to the latest release.

use crate::Context;
use crate::progress::DownloadBar;
use crate::ui;
use anyhow::{Context as _, Result};
use gotoolchain::{InstallMethod, InstallReport, Release, UpdateStatus, Updater};

pub fn run(ctx: &Context, updater: &Updater) -> Result<()> {
    let status = updater
        .check()
        .context("Could not determine whether Go needs updating")?;

    let Some(release) = announce(&status) else {
        return Ok(());
    };

    let report = install(ctx, updater, release)?;
    report_install(updater, &report);
    Ok(())
}

/// Describe the status; returns the release to install, if any.
pub(crate) fn announce(status: &UpdateStatus) -> Option<&Release> {
    match status {
        UpdateStatus::NotInstalled { .. } => {
            ui::info("Go not found in PATH. Trying to install.");
        }
        UpdateStatus::UpToDate { local } => {
            ui::info("The go command was found in PATH. Checking for updates.");
            ui::success(&format!("Your Go version ({}) is up to date.", local.version));
        }
        UpdateStatus::Outdated { local, latest } => {
            ui::info("The go command was found in PATH. Checking for updates.");
            ui::warn(&format!(
                "Your Go version ({}) is outdated. The most recent version is {}. \
                 Performing upgrade.",
                local.version, latest.version
            ));
        }
    }
    status.target()
}

fn install(ctx: &Context, updater: &Updater, release: &Release) -> Result<InstallReport> {
    let artifact = updater
        .artifact(release)
        .with_context(|| format!("Cannot install {}", release.version))?;

    ui::info(&format!(
        "Downloading {} ({})",
        artifact.filename,
        ui::format_size(artifact.size)
    ));
    if ctx.verbose > 0 {
        ui::kv("From", &updater.config().artifact_url(&artifact.filename));
        ui::kv("SHA-256", &artifact.sha256);
    }

    let bar = DownloadBar::new(ctx.quiet);
    updater
        .install_with_progress(release, &bar)
        .with_context(|| format!("Error performing Go installation of {}", release.version))
}

fn report_install(updater: &Updater, report: &InstallReport) {
    if let Some(warning) = &report.cleanup_warning {
        ui::warn(&format!("{warning}. You may need to remove it manually."));
    }

    if updater.is_dry_run() {
        ui::warn(&format!(
            "Dry run: {} was downloaded and verified, but the {} was not run.",
            report.filename, report.method
        ));
        return;
    }

    ui::success("Go installed successfully!");
    if report.method == InstallMethod::Tarball {
        if let Some(bin) = &report.path_hint {
            ui::info(&format!(
                "Since the installation was made via tarball, make sure '{}' is in your PATH.",
                bin.display()
            ));
            ui::dim("For more information, check: https://go.dev/doc/install#tarball");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing;
    use gotoolchain::backend::MockBackend;
    use gotoolchain::runner::MockRunner;
    use tempfile::TempDir;

    fn ctx() -> Context {
        Context {
            verbose: 0,
            quiet: true,
        }
    }

    #[test]
    fn test_up_to_date_downloads_nothing() {
        let dir = TempDir::new().unwrap();
        let backend = testing::backend();
        let runner = testing::runner_with_go("go1.21.0");

        run(&ctx(), &testing::updater(dir.path(), &backend, &runner)).unwrap();
        assert!(backend.downloads().is_empty());
    }

    #[test]
    fn test_outdated_installs_latest() {
        let dir = TempDir::new().unwrap();
        let backend = testing::backend();
        let runner = testing::runner_with_go("go1.20.7");

        run(&ctx(), &testing::updater(dir.path(), &backend, &runner)).unwrap();
        assert_eq!(
            backend.downloads(),
            vec!["go1.21.0.linux-amd64.tar.gz".to_string()]
        );
    }

    #[test]
    fn test_not_installed_installs_without_running_go() {
        let dir = TempDir::new().unwrap();
        let backend = testing::backend();
        let runner = MockRunner::new().with_program("tar", "/usr/bin/tar");

        run(&ctx(), &testing::updater(dir.path(), &backend, &runner)).unwrap();
        assert!(!runner.ran("go"));
        assert_eq!(backend.downloads().len(), 1);
    }

    #[test]
    fn test_empty_catalog_is_fatal() {
        let dir = TempDir::new().unwrap();
        let backend = MockBackend::new();
        let runner = testing::runner_with_go("go1.21.0");

        let result = run(&ctx(), &testing::updater(dir.path(), &backend, &runner));
        let err = result.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<gotoolchain::Error>(),
            Some(gotoolchain::Error::EmptyCatalog)
        ));
    }

    #[test]
    fn test_announce_target() {
        let latest = testing::release("go1.21.0", true);
        let status = UpdateStatus::NotInstalled {
            latest: latest.clone(),
        };
        assert_eq!(announce(&status), Some(&latest));
    }
}
