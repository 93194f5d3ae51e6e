//! Subprocess execution for build stages
//!
//! The orchestrator never spawns processes directly. It describes each step
//! as an [`Invocation`] and hands it to a [`CommandRunner`], which blocks
//! until the tool exits.

use super::types::{Stage, ToolStatus};
use crate::error::{Error, Result};
use std::fmt;
use std::path::PathBuf;
use std::process::{Command, Output};

/// A single external tool call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable to run
    pub program: PathBuf,
    /// Arguments, in order
    pub args: Vec<String>,
    /// Working directory for the call
    pub cwd: PathBuf,
}

impl Invocation {
    #[must_use]
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: cwd.into(),
        }
    }

    /// Render the invocation as a shell-style command line
    #[must_use]
    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.command_line())
    }
}

/// Runs build stage invocations to completion
///
/// Implementations must block until the tool exits and report any
/// unsuccessful exit as [`Error::BuildTool`].
pub trait CommandRunner: fmt::Debug {
    fn run(&mut self, stage: Stage, invocation: &Invocation) -> Result<()>;
}

/// Runs invocations as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner {
    /// Stream tool output to the terminal instead of capturing it
    verbose: bool,
}

impl SystemRunner {
    #[must_use]
    pub const fn new(verbose: bool) -> Self {
        Self { verbose }
    }

    fn failure(stage: Stage, invocation: &Invocation, status: ToolStatus, output: String) -> Error {
        Error::BuildTool {
            stage,
            command: invocation.command_line(),
            status,
            output,
        }
    }

    fn captured(output: &Output) -> String {
        let mut buffer = String::from_utf8_lossy(&output.stdout).to_string();
        buffer.push_str(&String::from_utf8_lossy(&output.stderr));
        buffer
    }
}

impl CommandRunner for SystemRunner {
    fn run(&mut self, stage: Stage, invocation: &Invocation) -> Result<()> {
        tracing::debug!(
            stage = stage.as_str(),
            cwd = %invocation.cwd.display(),
            "running {invocation}"
        );

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args).current_dir(&invocation.cwd);

        let (status, output) = if self.verbose {
            let status = cmd.status().map_err(|e| {
                Self::failure(
                    stage,
                    invocation,
                    ToolStatus::NotStarted(e.to_string()),
                    String::new(),
                )
            })?;
            (status, String::new())
        } else {
            let output = cmd.output().map_err(|e| {
                Self::failure(
                    stage,
                    invocation,
                    ToolStatus::NotStarted(e.to_string()),
                    String::new(),
                )
            })?;
            (output.status, Self::captured(&output))
        };

        if status.success() {
            return Ok(());
        }

        let tool_status = status.code().map_or(ToolStatus::Terminated, ToolStatus::Code);
        Err(Self::failure(stage, invocation, tool_status, output))
    }
}
