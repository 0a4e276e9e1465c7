use crate::Context;
use crate::ui;
use anyhow::{Context as _, Result};
use colored::Colorize;
use gotoolchain::{Release, Updater};

pub fn run(ctx: &Context, updater: &Updater, all: bool) -> Result<()> {
    let releases = updater
        .releases()
        .context("Could not fetch the Go release catalog")?;
    let shown = visible(&releases, all);

    if shown.is_empty() {
        ui::info("No releases published.");
        return Ok(());
    }

    ui::header("Go releases");
    for (i, release) in shown.iter().enumerate() {
        let mut line = release.version.bold().to_string();
        if !release.stable {
            line.push_str(&format!(" {}", "(unstable)".yellow()));
        }
        if i == 0 {
            line.push_str(&format!(" {}", "latest".green()));
        }
        println!("  {line}");

        if ctx.verbose > 0 {
            ui::dim(&format!("{} files", release.files.len()));
        }
    }
    Ok(())
}

/// Releases to list, in catalog order.
fn visible(releases: &[Release], all: bool) -> Vec<&Release> {
    releases.iter().filter(|r| all || r.stable).collect()
}
