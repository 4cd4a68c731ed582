//! # Command Runner
//!
//! The publish workflow's only I/O primitive. Every git interaction is
//! expressed as an [`Invocation`] and executed through a [`CommandRunner`],
//! which captures the exit status and output instead of inheriting the
//! terminal.
//!
//! The trait exists so the reconciliation logic can be driven by a fake that
//! replays scripted acceptance/rejection sequences; [`SystemRunner`] is the
//! implementation used by the binary.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use crate::error::{Error, Result};

/// A single command to execute.
///
/// Environment entries are passed to the child process but never displayed,
/// which is how credentials reach git without landing in logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub envs: Vec<(String, String)>,
}

impl Invocation {
    /// A `git` invocation in `cwd`.
    pub fn git<I, S>(cwd: &Path, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: "git".to_string(),
            args: args.into_iter().map(Into::into).collect(),
            cwd: cwd.to_path_buf(),
            envs: Vec::new(),
        }
    }

    /// Adds environment entries for the child process.
    pub fn with_envs(mut self, envs: &[(String, String)]) -> Self {
        self.envs.extend(envs.iter().cloned());
        self
    }

    /// Whether the arguments start with `prefix`.
    pub fn starts_with(&self, prefix: &[&str]) -> bool {
        self.args.len() >= prefix.len() && self.args.iter().zip(prefix).all(|(a, p)| a == p)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.contains(char::is_whitespace) {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Captured result of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A successful output with the given stdout.
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed output with the given exit code and stderr.
    pub fn failed(code: i32, stderr: impl Into<String>) -> Self {
        Self {
            code: Some(code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Converts a non-zero exit into [`Error::Subprocess`].
    pub fn check(self, invocation: &Invocation) -> Result<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(Error::Subprocess {
                command: invocation.to_string(),
                code: self.code,
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// Executes external commands.
pub trait CommandRunner: Send + Sync {
    /// Runs the invocation to completion. A non-zero exit is *not* an error
    /// at this level; only failing to start the process is.
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput>;
}

/// Runs commands as real child processes.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> Result<CommandOutput> {
        debug!("$ {}", invocation);

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .envs(invocation.envs.iter().map(|(k, v)| (k, v)))
            .output()
            .map_err(|e| Error::Spawn {
                program: invocation.program.clone(),
                message: e.to_string(),
            })?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
