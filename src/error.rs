//! Error types
//!
//! Every failure in the orchestrator is terminal: nothing here is retried.
//! The only degraded path (a missing source-control revision) never becomes
//! an `Error` at all.

use crate::extensions::types::{Stage, ToolStatus};
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A required executable is not resolvable on the search path
    #[error("required executable `{tool}` not found in PATH")]
    MissingTool { tool: String },

    /// Missing or malformed input, or a violated invariant
    #[error("{0}")]
    Configuration(String),

    /// A delegated subprocess exited non-zero or could not be started
    #[error("{stage} step failed: `{command}` {status}")]
    BuildTool {
        stage: Stage,
        command: String,
        status: ToolStatus,
        /// Captured stdout + stderr (empty when output was streamed)
        output: String,
    },

    /// A command that this packaging model cannot support
    #[error("`{command}` is not supported: native builds cannot be installed in place")]
    UnsupportedMode { command: String },

    /// Filesystem failure while writing generated files or copying artifacts
    #[error("{context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    /// Build a `Configuration` error from anything printable
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Wrap an I/O error with a description of what was being attempted
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Name of the stage that produced this error, for user-facing reports
    #[must_use]
    pub fn stage(&self) -> &str {
        match self {
            Self::MissingTool { .. } => "preflight",
            Self::Configuration(_) => "configuration",
            Self::BuildTool { stage, .. } => stage.as_str(),
            Self::UnsupportedMode { .. } => "lifecycle",
            Self::Io { .. } => "filesystem",
        }
    }

    /// Captured tool output for `BuildTool` errors, if any was collected
    #[must_use]
    pub fn tool_output(&self) -> Option<&str> {
        match self {
            Self::BuildTool { output, .. } if !output.trim().is_empty() => Some(output),
            _ => None,
        }
    }
}
