//! Python interpreter detection
//!
//! The native build links against the interpreter that will import the
//! package, so its executable and header directory are passed to `CMake`.

use crate::env_vars;
use crate::error::{Error, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Interpreter names tried on `PATH`, in order
const INTERPRETER_CANDIDATES: [&str; 2] = ["python3", "python"];

/// Prints the interpreter's C header directory
const INCLUDE_QUERY: &str = "import sysconfig; print(sysconfig.get_paths()['include'])";

/// Ambient interpreter information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterpreterInfo {
    /// Path to the interpreter executable
    pub executable: PathBuf,
    /// Directory holding `Python.h`
    pub include_dir: PathBuf,
}

/// Supplies interpreter information to the build
pub trait InterpreterProbe: fmt::Debug {
    fn probe(&self) -> Result<InterpreterInfo>;
}

/// Finds the interpreter on the system and asks it for its include dir
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemInterpreter;

impl SystemInterpreter {
    /// Find the interpreter executable.
    ///
    /// Priority order:
    /// 1. `PYTHON_EXECUTABLE` environment variable
    /// 2. `python3` in `PATH`
    /// 3. `python` in `PATH`
    fn find_executable() -> Result<PathBuf> {
        if let Some(path) = env_vars::python_executable() {
            let path = PathBuf::from(path);
            if path.exists() {
                return Ok(path);
            }
            return Err(Error::config(format!(
                "PYTHON_EXECUTABLE points to {}, which does not exist",
                path.display()
            )));
        }

        INTERPRETER_CANDIDATES
            .iter()
            .find_map(|name| which::which(name).ok())
            .ok_or_else(|| {
                Error::config("no Python interpreter found (tried python3, python)")
            })
    }

    fn query_include_dir(executable: &Path) -> Result<PathBuf> {
        let output = Command::new(executable)
            .args(["-c", INCLUDE_QUERY])
            .output()
            .map_err(|e| {
                Error::config(format!(
                    "failed to run {} to locate Python headers: {e}",
                    executable.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::config(format!(
                "{} could not report its include directory: {}",
                executable.display(),
                stderr.trim()
            )));
        }

        let include = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if include.is_empty() {
            return Err(Error::config(format!(
                "{} reported an empty include directory",
                executable.display()
            )));
        }
        Ok(PathBuf::from(include))
    }
}

impl InterpreterProbe for SystemInterpreter {
    fn probe(&self) -> Result<InterpreterInfo> {
        let executable = Self::find_executable()?;
        let include_dir = Self::query_include_dir(&executable)?;
        tracing::debug!(
            "interpreter {} (include {})",
            executable.display(),
            include_dir.display()
        );
        Ok(InterpreterInfo {
            executable,
            include_dir,
        })
    }
}
