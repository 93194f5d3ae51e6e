//! Artifact assembly
//!
//! After `make install`, the staged install prefix holds the package trees
//! the distributable needs. Each named tree is copied into the package
//! output directory. Copies merge into whatever is already there: existing
//! destination files that the install tree does not contain are left alone,
//! files it does contain are overwritten.

use crate::error::{Error, Result};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Top-level directories copied out of the install prefix
pub const ARTIFACT_DIRS: [&str; 2] = ["caffe", "caffe2"];

/// One `install_dir/<name>` -> `build_lib/<name>` mapping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactMapping {
    pub name: String,
    pub source: PathBuf,
    pub destination: PathBuf,
}

/// Ordered set of directory mappings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSet {
    mappings: Vec<ArtifactMapping>,
}

impl ArtifactSet {
    /// The package's artifact set: [`ARTIFACT_DIRS`] under both roots
    #[must_use]
    pub fn standard(install_dir: &Path, build_lib: &Path) -> Self {
        Self::from_names(&ARTIFACT_DIRS, install_dir, build_lib)
    }

    /// Build a set from directory names, preserving order and dropping repeats
    #[must_use]
    pub fn from_names(names: &[&str], install_dir: &Path, build_lib: &Path) -> Self {
        let mut mappings: Vec<ArtifactMapping> = Vec::with_capacity(names.len());
        for name in names {
            if mappings.iter().any(|m| m.name == *name) {
                continue;
            }
            mappings.push(ArtifactMapping {
                name: (*name).to_string(),
                source: install_dir.join(name),
                destination: build_lib.join(name),
            });
        }
        Self { mappings }
    }

    #[must_use]
    pub fn mappings(&self) -> &[ArtifactMapping] {
        &self.mappings
    }

    /// Destination directories, in order
    #[must_use]
    pub fn destinations(&self) -> Vec<PathBuf> {
        self.mappings.iter().map(|m| m.destination.clone()).collect()
    }

    /// Copy every mapping's source tree into its destination.
    ///
    /// Returns the number of files copied. A missing source directory means
    /// the install step did not produce what the package expects and is a
    /// configuration error.
    pub fn assemble(&self) -> Result<usize> {
        let mut copied = 0;
        for mapping in &self.mappings {
            if !mapping.source.is_dir() {
                return Err(Error::config(format!(
                    "install step did not produce `{}` (expected directory {})",
                    mapping.name,
                    mapping.source.display()
                )));
            }
            copied += copy_tree(&mapping.source, &mapping.destination)?;
            tracing::debug!(
                "copied {} -> {}",
                mapping.source.display(),
                mapping.destination.display()
            );
        }
        Ok(copied)
    }
}

/// Recursively copy `source` into `destination`, merging with existing content.
///
/// Symlinks are followed so the destination holds regular files.
pub fn copy_tree(source: &Path, destination: &Path) -> Result<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(source).follow_links(true) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(source).display().to_string();
            Error::io(
                format!("Failed to read {path}"),
                e.into_io_error()
                    .unwrap_or_else(|| std::io::Error::other("filesystem loop detected")),
            )
        })?;

        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|_| Error::config(format!("{} escaped its root", entry.path().display())))?;
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target)
                .map_err(|e| Error::io(format!("Failed to create {}", target.display()), e))?;
        } else {
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| {
                    Error::io(format!("Failed to create {}", parent.display()), e)
                })?;
            }
            fs::copy(entry.path(), &target).map_err(|e| {
                Error::io(
                    format!(
                        "Failed to copy {} to {}",
                        entry.path().display(),
                        target.display()
                    ),
                    e,
                )
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}
