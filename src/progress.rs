//! Download progress bar.

use gotoolchain::DownloadProgress;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// Renders download progress with indicatif.
pub struct DownloadBar {
    bar: ProgressBar,
}

impl DownloadBar {
    /// Create a bar; hidden when `quiet`.
    pub fn new(quiet: bool) -> Self {
        let bar = ProgressBar::hidden();
        if !quiet {
            bar.set_draw_target(ProgressDrawTarget::stderr());
        }
        Self { bar }
    }
}

impl DownloadProgress for DownloadBar {
    fn on_start(&self, filename: &str, expected_size: Option<u64>) {
        let style = match expected_size {
            Some(size) => {
                self.bar.set_length(size);
                ProgressStyle::default_bar().template(
                    "{spinner:.green} [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}",
                )
            }
            None => ProgressStyle::default_spinner().template("{spinner:.green} {bytes} {msg}"),
        };
        if let Ok(style) = style {
            self.bar.set_style(style.progress_chars("=>-"));
        }
        self.bar.set_message(filename.to_string());
    }

    fn on_advance(&self, bytes: u64) {
        self.bar.inc(bytes);
    }

    fn on_finish(&self) {
        self.bar.finish_and_clear();
    }
}
