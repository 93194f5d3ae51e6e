//! Extension type definitions
//!
//! The package carries a single native build product. It is registered as
//! an opaque `ExtensionUnit`; the actual build is driven by
//! [`NativeBuildOrchestrator`](super::NativeBuildOrchestrator) as one
//! `CMake` invocation.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Name of the extension unit registered by default
pub const DEFAULT_EXTENSION_NAME: &str = "caffe2-ext";

/// Marker for "the entire native build product"
///
/// Carries no build instructions of its own. Exactly one must be registered
/// for a build to proceed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtensionUnit {
    /// Name the packaging collaborator knows the unit by
    pub name: String,
}

impl ExtensionUnit {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for ExtensionUnit {
    fn default() -> Self {
        Self::new(DEFAULT_EXTENSION_NAME)
    }
}

/// Subprocess stages of the native build, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Generate build files with `cmake`
    Configure,
    /// Compile with `make -jN`
    Compile,
    /// Install to the staging prefix with `make install`
    Install,
}

impl Stage {
    /// All stages, in the order they run
    pub const ALL: [Self; 3] = [Self::Configure, Self::Compile, Self::Install];

    #[must_use]
    #[inline]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Configure => "configure",
            Self::Compile => "compile",
            Self::Install => "install",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a delegated tool finished, when it did not succeed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolStatus {
    /// Exited with a non-zero code
    Code(i32),
    /// Terminated without an exit code (killed by a signal)
    Terminated,
    /// Could not be spawned at all
    NotStarted(String),
}

impl fmt::Display for ToolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Code(code) => write!(f, "exited with status {code}"),
            Self::Terminated => f.write_str("was terminated by a signal"),
            Self::NotStarted(reason) => write!(f, "could not be started: {reason}"),
        }
    }
}

/// Result of a completed native build
#[derive(Debug)]
pub struct BuildReport {
    /// Name of the extension unit that was built
    pub extension: String,

    /// Wall-clock duration of all stages
    pub duration: Duration,

    /// Package output directories populated by artifact assembly
    pub outputs: Vec<PathBuf>,

    /// Number of files copied during artifact assembly
    pub files_copied: usize,
}
