//! Report whether an update is available without installing anything.

use crate::Context;
use crate::ui;
use anyhow::{Context as _, Result};
use gotoolchain::{UpdateStatus, Updater};

pub fn run(ctx: &Context, updater: &Updater) -> Result<()> {
    let status = updater
        .check()
        .context("Could not determine whether Go needs updating")?;

    ui::header("Go toolchain");
    match &status {
        UpdateStatus::NotInstalled { latest } => {
            ui::kv("Installed", "not found in PATH");
            ui::kv("Latest", &latest.version);
        }
        UpdateStatus::UpToDate { local } => {
            ui::kv("Installed", &local.version);
            ui::kv("Platform", &local.platform().to_string());
        }
        UpdateStatus::Outdated { local, latest } => {
            ui::kv("Installed", &local.version);
            ui::kv("Platform", &local.platform().to_string());
            ui::kv("Latest", &latest.version);
        }
    }
    if ctx.verbose > 0 {
        if let Some(path) = updater.local_path() {
            ui::kv("Path", &path.display().to_string());
        }
        ui::kv("Host", &updater.platform().to_string());
    }

    println!();
    match status {
        UpdateStatus::UpToDate { .. } => ui::success("Go is up to date."),
        UpdateStatus::Outdated { .. } => {
            ui::warn("An update is available. Run 'updatego' to install it.");
        }
        UpdateStatus::NotInstalled { .. } => ui::info("Run 'updatego' to install Go."),
    }
    Ok(())
}
