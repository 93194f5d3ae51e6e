//! Python source collection
//!
//! Copies the modules of each configured package into the package output
//! directory. Packages are dotted names (`caffe2.python`); each one maps to
//! a directory under the project root and only its own `*.py` files are
//! collected. Subpackages are listed separately.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directory of a dotted package name, relative to a root
#[must_use]
pub fn package_dir(package: &str) -> PathBuf {
    package.split('.').collect()
}

/// Copy the Python modules of `packages` from `project_root` into `build_lib`.
///
/// Returns the destination path of every copied module.
pub fn collect_sources(
    project_root: &Path,
    packages: &[String],
    build_lib: &Path,
) -> Result<Vec<PathBuf>> {
    let mut collected = Vec::new();

    for package in packages {
        let relative = package_dir(package);
        let source_dir = project_root.join(&relative);
        if !source_dir.is_dir() {
            return Err(Error::config(format!(
                "package `{package}` has no directory at {}",
                source_dir.display()
            )));
        }

        let destination_dir = build_lib.join(&relative);
        fs::create_dir_all(&destination_dir).map_err(|e| {
            Error::io(format!("Failed to create {}", destination_dir.display()), e)
        })?;

        for entry in WalkDir::new(&source_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                Error::io(
                    format!("Failed to read {}", source_dir.display()),
                    e.into_io_error()
                        .unwrap_or_else(|| std::io::Error::other("filesystem loop detected")),
                )
            })?;

            let is_module = entry.file_type().is_file()
                && entry.path().extension().is_some_and(|ext| ext == "py");
            if !is_module {
                continue;
            }

            let target = destination_dir.join(entry.file_name());
            fs::copy(entry.path(), &target).map_err(|e| {
                Error::io(
                    format!("Failed to copy {} to {}", entry.path().display(), target.display()),
                    e,
                )
            })?;
            collected.push(target);
        }
        tracing::debug!("collected package {package}");
    }

    Ok(collected)
}
