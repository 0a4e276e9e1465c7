//! Inspection of the locally installed toolchain.
//!
//! The local version is whatever `go version` reports for the `go` found on
//! PATH. Its output must be exactly `<name> version <version> <os>/<arch>`;
//! anything else is rejected rather than guessed at.

use crate::error::{Error, Result};
use crate::runner::{CommandRunner, command_line};
use crate::types::LocalVersionInfo;
use std::path::PathBuf;

/// Looks up and queries the local toolchain.
pub struct Inspector<'a> {
    runner: &'a dyn CommandRunner,
    binary: &'a str,
}

impl<'a> Inspector<'a> {
    /// Create an inspector for the executable named `binary`.
    #[must_use]
    pub fn new(runner: &'a dyn CommandRunner, binary: &'a str) -> Self {
        Self { runner, binary }
    }

    /// Where the executable resolves on PATH, if anywhere.
    #[must_use]
    pub fn locate(&self) -> Option<PathBuf> {
        self.runner.resolve(self.binary)
    }

    /// Whether the executable is on PATH.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.locate().is_some()
    }

    /// Run `<binary> version` and parse its output.
    ///
    /// # Errors
    ///
    /// - `Error::ToolNotFound` if the executable cannot be started
    /// - `Error::CommandFailed` if it exits with a non-zero status
    /// - `Error::UnexpectedOutput` if the output is not in the expected form
    pub fn inspect(&self) -> Result<LocalVersionInfo> {
        let args = ["version"];
        let command = command_line(self.binary, &args);

        let output = self.runner.run(self.binary, &args)?.check(&command)?;
        let info = parse_output(&command, &output.stdout_str())?;

        log::debug!(
            "local toolchain: {} ({}/{})",
            info.version,
            info.os,
            info.arch
        );
        Ok(info)
    }
}

/// Parse the output of `go version`.
///
/// Surrounding whitespace is trimmed; the rest must split on single spaces
/// into exactly four tokens, the last of which must split on `/` into
/// exactly two.
///
/// # Example
///
/// ```
/// use gotoolchain::local::parse_version_output;
///
/// let info = parse_version_output("go version go1.20.3 linux/amd64\n").unwrap();
/// assert_eq!(info.version, "go1.20.3");
/// assert_eq!(info.os, "linux");
/// assert_eq!(info.arch, "amd64");
/// ```
///
/// # Errors
///
/// Returns `Error::UnexpectedOutput` carrying the raw text otherwise.
pub fn parse_version_output(output: &str) -> Result<LocalVersionInfo> {
    parse_output("go version", output)
}

/// Parse version output, attributing failures to `command`.
fn parse_output(command: &str, output: &str) -> Result<LocalVersionInfo> {
    let unexpected = |reason: String| Error::UnexpectedOutput {
        command: command.to_string(),
        reason,
        output: output.to_string(),
    };

    let parts: Vec<&str> = output.trim().split(' ').collect();
    if parts.len() != 4 {
        return Err(unexpected(format!(
            "expected 4 components, got {}",
            parts.len()
        )));
    }

    let os_arch: Vec<&str> = parts[3].split('/').collect();
    if os_arch.len() != 2 {
        return Err(unexpected(format!(
            "could not split '{}' into os and arch",
            parts[3]
        )));
    }

    Ok(LocalVersionInfo {
        version: parts[2].to_string(),
        os: os_arch[0].to_string(),
        arch: os_arch[1].to_string(),
    })
}
