//! Toolchain preflight
//!
//! Resolves the build-file generator and the build driver on the search
//! path before anything else runs. There is no fallback tool.

use crate::error::{Error, Result};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Build-file generator executable
pub const GENERATOR: &str = "cmake";

/// Build driver executable
pub const DRIVER: &str = "make";

/// Resolved paths of the external build toolchain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub generator: PathBuf,
    pub driver: PathBuf,
}

impl Toolchain {
    /// Resolve both tools from the process `PATH`.
    pub fn locate() -> Result<Self> {
        let generator = resolve(GENERATOR, |tool| which::which(tool))?;
        let driver = resolve(DRIVER, |tool| which::which(tool))?;
        tracing::debug!(
            "toolchain: {} / {}",
            generator.display(),
            driver.display()
        );
        Ok(Self { generator, driver })
    }

    /// Resolve both tools from an explicit search path.
    ///
    /// `paths` uses the platform `PATH` syntax; `cwd` anchors relative entries.
    pub fn locate_in(paths: impl AsRef<OsStr>, cwd: &Path) -> Result<Self> {
        let paths = paths.as_ref();
        let generator = resolve(GENERATOR, |tool| which::which_in(tool, Some(paths), cwd))?;
        let driver = resolve(DRIVER, |tool| which::which_in(tool, Some(paths), cwd))?;
        Ok(Self { generator, driver })
    }
}

fn resolve(
    tool: &str,
    lookup: impl Fn(&str) -> std::result::Result<PathBuf, which::Error>,
) -> Result<PathBuf> {
    lookup(tool).map_err(|_| Error::MissingTool {
        tool: tool.to_string(),
    })
}
