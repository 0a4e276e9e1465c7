//! External process invocation.
//!
//! Every shell-out (`go version`, installers, `tar`) goes through the
//! [`CommandRunner`] trait so the rest of the crate can be exercised without
//! touching the host. [`SystemRunner`] runs real processes; [`MockRunner`]
//! records invocations and replays scripted output.

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::{Arc, Mutex};

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Raw standard output.
    pub stdout: Vec<u8>,
    /// Raw standard error.
    pub stderr: Vec<u8>,
    /// Exit code, `None` if the process was killed by a signal.
    pub status: Option<i32>,
    /// Whether the process exited successfully.
    pub success: bool,
}

impl From<Output> for CommandOutput {
    fn from(output: Output) -> Self {
        Self {
            stdout: output.stdout,
            stderr: output.stderr,
            status: output.status.code(),
            success: output.status.success(),
        }
    }
}

impl CommandOutput {
    /// A successful run that printed `stdout`.
    #[must_use]
    pub fn ok(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: Vec::new(),
            status: Some(0),
            success: true,
        }
    }

    /// A failed run with the given exit code and error output.
    #[must_use]
    pub fn failed(code: i32, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            stdout: Vec::new(),
            stderr: stderr.into(),
            status: Some(code),
            success: false,
        }
    }

    /// Get stdout as a string
    pub fn stdout_str(&self) -> String {
        String::from_utf8_lossy(&self.stdout).to_string()
    }

    /// Get stderr as a string
    pub fn stderr_str(&self) -> String {
        String::from_utf8_lossy(&self.stderr).to_string()
    }

    /// Stdout followed by stderr, for diagnostics.
    pub fn combined(&self) -> String {
        let mut out = self.stdout_str();
        out.push_str(&self.stderr_str());
        out
    }

    /// Turn a non-success exit into `Error::CommandFailed`.
    pub fn check(self, command: &str) -> Result<Self> {
        if self.success {
            Ok(self)
        } else {
            Err(Error::CommandFailed {
                command: command.to_string(),
                status: self.status,
                output: self.combined(),
            })
        }
    }
}

/// Render a program and its arguments as one line.
pub fn command_line(program: &str, args: &[&str]) -> String {
    if args.is_empty() {
        program.to_string()
    } else {
        format!("{} {}", program, args.join(" "))
    }
}

/// Runs external programs and resolves executables on PATH.
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` to completion and capture its output.
    ///
    /// # Errors
    ///
    /// Returns `Error::ToolNotFound` if the program cannot be started. A
    /// non-zero exit is *not* an error at this level.
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput>;

    /// Resolve an executable name against the search path.
    fn resolve(&self, program: &str) -> Option<PathBuf>;
}

/// Runner that executes real processes.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    /// Create a new system runner.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        log::debug!("running: {}", command_line(program, args));

        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|e| Error::ToolNotFound(format!("failed to execute {}: {}", program, e)))?;

        Ok(output.into())
    }

    fn resolve(&self, program: &str) -> Option<PathBuf> {
        which::which(program).ok()
    }
}

/// A single recorded invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name.
    pub program: String,
    /// Arguments.
    pub args: Vec<String>,
}

impl Invocation {
    /// The invocation rendered as one command line.
    #[must_use]
    pub fn line(&self) -> String {
        let args: Vec<&str> = self.args.iter().map(String::as_str).collect();
        command_line(&self.program, &args)
    }
}

/// Mock runner for testing without spawning processes.
///
/// Programs answer with the output registered through [`MockRunner::respond`],
/// or a successful empty output otherwise. Clones share state, so a clone
/// kept by the test sees every invocation made through the boxed runner.
#[derive(Debug, Clone, Default)]
pub struct MockRunner {
    responses: Arc<Mutex<HashMap<String, CommandOutput>>>,
    path: Arc<Mutex<HashMap<String, PathBuf>>>,
    invocations: Arc<Mutex<Vec<Invocation>>>,
}

impl MockRunner {
    /// Create a runner with an empty PATH and no scripted responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `program` resolvable on the mock PATH.
    #[must_use]
    pub fn with_program(self, program: &str, path: impl Into<PathBuf>) -> Self {
        self.path
            .lock()
            .unwrap()
            .insert(program.to_string(), path.into());
        self
    }

    /// Script the output returned whenever `program` runs.
    #[must_use]
    pub fn respond(self, program: &str, output: CommandOutput) -> Self {
        self.responses
            .lock()
            .unwrap()
            .insert(program.to_string(), output);
        self
    }

    /// Every invocation so far, in order.
    #[must_use]
    pub fn invocations(&self) -> Vec<Invocation> {
        self.invocations.lock().unwrap().clone()
    }

    /// Whether `program` was ever run.
    #[must_use]
    pub fn ran(&self, program: &str) -> bool {
        self.invocations
            .lock()
            .unwrap()
            .iter()
            .any(|i| i.program == program)
    }
}

impl CommandRunner for MockRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        self.invocations.lock().unwrap().push(Invocation {
            program: program.to_string(),
            args: args.iter().map(|a| (*a).to_string()).collect(),
        });

        let responses = self.responses.lock().unwrap();
        Ok(responses
            .get(program)
            .cloned()
            .unwrap_or_else(|| CommandOutput::ok(Vec::new())))
    }

    fn resolve(&self, program: &str) -> Option<PathBuf> {
        self.path.lock().unwrap().get(program).cloned()
    }
}
