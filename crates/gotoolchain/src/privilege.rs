//! Elevated operations.
//!
//! Installing a package, removing the previous tree and extracting a tarball
//! over a system directory all need administrator rights. They are expressed
//! as [`PrivilegedCommand`] values and handed to a [`Privileged`]
//! implementation: [`Sudo`] runs them for real, [`DryRun`] only records what
//! would have run.

use crate::error::Result;
use crate::runner::{CommandOutput, CommandRunner, Invocation, command_line};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// A command that may need elevated privileges.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrivilegedCommand {
    /// Program to run.
    pub program: String,
    /// Arguments.
    pub args: Vec<String>,
    /// Whether the command must run elevated.
    pub elevate: bool,
}

impl PrivilegedCommand {
    /// Create a command.
    #[must_use]
    pub fn new(program: impl Into<String>, args: &[&str], elevate: bool) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
            elevate,
        }
    }

    /// `msiexec /package <path> /passive`; Windows Installer elevates itself.
    #[must_use]
    pub fn msi_install(package: &Path) -> Self {
        let package = package.to_string_lossy();
        Self::new("msiexec", &["/package", &package, "/passive"], false)
    }

    /// `installer -pkg <path> -target /`, elevated.
    #[must_use]
    pub fn pkg_install(package: &Path) -> Self {
        let package = package.to_string_lossy();
        Self::new("installer", &["-pkg", &package, "-target", "/"], true)
    }

    /// `rm -rf <path>`, elevated.
    #[must_use]
    pub fn remove_tree(path: &Path) -> Self {
        let path = path.to_string_lossy();
        Self::new("rm", &["-rf", &path], true)
    }

    /// `tar -C <dest> -xzf <archive>`, elevated.
    #[must_use]
    pub fn extract(archive: &Path, dest: &Path) -> Self {
        let archive = archive.to_string_lossy();
        let dest = dest.to_string_lossy();
        Self::new("tar", &["-C", &dest, "-xzf", &archive], true)
    }

    /// Arguments as string slices.
    pub fn arg_refs(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }

    /// Command line as it would be typed, including `sudo` when elevated.
    pub fn line(&self) -> String {
        let line = command_line(&self.program, &self.arg_refs());
        if self.elevate && cfg!(unix) {
            format!("sudo {line}")
        } else {
            line
        }
    }
}

/// Executes privileged commands.
pub trait Privileged: Send + Sync {
    /// Run the command, elevating if requested.
    ///
    /// A non-zero exit is reported through the returned output, not as an
    /// error.
    fn execute(&self, command: &PrivilegedCommand) -> Result<CommandOutput>;

    /// Whether commands actually run.
    fn is_dry_run(&self) -> bool {
        false
    }
}

/// Runs privileged commands through `sudo`.
///
/// The user is expected to be able to authenticate with sudo interactively
/// or to have it pre-authorized.
pub struct Sudo {
    runner: Box<dyn CommandRunner>,
}

impl Sudo {
    /// Create a sudo wrapper around a command runner.
    #[must_use]
    pub fn new(runner: Box<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

impl Privileged for Sudo {
    fn execute(&self, command: &PrivilegedCommand) -> Result<CommandOutput> {
        log::info!("running: {}", command.line());

        let args = command.arg_refs();
        if command.elevate && cfg!(unix) {
            let mut sudo_args = Vec::with_capacity(args.len() + 1);
            sudo_args.push(command.program.as_str());
            sudo_args.extend(args);
            self.runner.run("sudo", &sudo_args)
        } else {
            self.runner.run(&command.program, &args)
        }
    }
}

/// Records privileged commands instead of running them.
///
/// Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct DryRun {
    issued: Arc<Mutex<Vec<Invocation>>>,
}

impl DryRun {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Commands that would have run, in order.
    #[must_use]
    pub fn issued(&self) -> Vec<Invocation> {
        self.issued.lock().unwrap().clone()
    }
}

impl Privileged for DryRun {
    fn execute(&self, command: &PrivilegedCommand) -> Result<CommandOutput> {
        log::warn!("dry run, not running: {}", command.line());
        self.issued.lock().unwrap().push(Invocation {
            program: command.program.clone(),
            args: command.args.clone(),
        });
        Ok(CommandOutput::ok(Vec::new()))
    }

    fn is_dry_run(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::MockRunner;
    use std::path::PathBuf;

    #[test]
    fn test_pkg_install_command() {
        let cmd = PrivilegedCommand::pkg_install(Path::new(".tmp/go1.21.0.darwin-arm64.pkg"));
        assert_eq!(cmd.program, "installer");
        assert_eq!(
            cmd.args,
            vec!["-pkg", ".tmp/go1.21.0.darwin-arm64.pkg", "-target", "/"]
        );
        assert!(cmd.elevate);
    }

    #[test]
    fn test_msi_install_command() {
        let cmd = PrivilegedCommand::msi_install(Path::new("go.msi"));
        assert_eq!(cmd.program, "msiexec");
        assert_eq!(cmd.args, vec!["/package", "go.msi", "/passive"]);
        assert!(!cmd.elevate);
    }

    #[test]
    fn test_extract_command() {
        let cmd = PrivilegedCommand::extract(
            Path::new(".tmp/go.tar.gz"),
            &PathBuf::from("/usr/local"),
        );
        assert_eq!(cmd.args, vec!["-C", "/usr/local", "-xzf", ".tmp/go.tar.gz"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_line_includes_sudo_when_elevated() {
        let cmd = PrivilegedCommand::remove_tree(Path::new("/usr/local/go"));
        assert_eq!(cmd.line(), "sudo rm -rf /usr/local/go");

        let plain = PrivilegedCommand::new("msiexec", &["/package", "go.msi"], false);
        assert_eq!(plain.line(), "msiexec /package go.msi");
    }

    #[cfg(unix)]
    #[test]
    fn test_sudo_prefixes_elevated_commands() {
        let runner = MockRunner::new();
        let sudo = Sudo::new(Box::new(runner.clone()));

        sudo.execute(&PrivilegedCommand::extract(
            Path::new("go.tar.gz"),
            Path::new("/usr/local"),
        ))
        .unwrap();

        let calls = runner.invocations();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].program, "sudo");
        assert_eq!(calls[0].line(), "sudo tar -C /usr/local -xzf go.tar.gz");
    }

    #[test]
    fn test_sudo_runs_unelevated_commands_directly() {
        let runner = MockRunner::new();
        let sudo = Sudo::new(Box::new(runner.clone()));

        sudo.execute(&PrivilegedCommand::msi_install(Path::new("go.msi")))
            .unwrap();

        assert_eq!(runner.invocations()[0].program, "msiexec");
        assert!(!sudo.is_dry_run());
    }

    #[test]
    fn test_dry_run_records_without_running() {
        let dry_run = DryRun::new();
        let shared = dry_run.clone();

        let output = dry_run
            .execute(&PrivilegedCommand::remove_tree(Path::new("/usr/local/go")))
            .unwrap();

        assert!(output.success);
        assert!(dry_run.is_dry_run());
        let issued = shared.issued();
        assert_eq!(issued.len(), 1);
        assert_eq!(issued[0].line(), "rm -rf /usr/local/go");
    }
}
