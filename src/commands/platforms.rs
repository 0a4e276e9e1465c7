//! Diagnostic listing of the platforms a release ships artifacts for.

use crate::Context;
use crate::ui;
use anyhow::{Context as _, Result};
use colored::Colorize;
use gotoolchain::Updater;

pub fn run(_ctx: &Context, updater: &Updater, version: Option<&str>) -> Result<()> {
    let release = match version {
        Some(version) => updater.release(version),
        None => updater.latest(),
    }
    .context("Could not find the requested release")?;

    let host = updater.platform();
    let pairs = release.platform_pairs();

    ui::header(&format!("Platforms for {}", release.version));
    for platform in &pairs {
        if platform == host {
            println!("  {} {}", platform.to_string().bold(), "(this host)".green());
        } else {
            println!("  {platform}");
        }
    }

    println!();
    match updater.artifact(&release) {
        Ok(artifact) => ui::success(&format!(
            "{} would be installed on {host}",
            artifact.filename
        )),
        Err(e) => ui::warn(&e.to_string()),
    }
    Ok(())
}
