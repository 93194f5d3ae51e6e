//! Version resolution and the generated version module
//!
//! The package version comes from `VERSION_NUMBER` at the project root and
//! is mandatory. The source-control revision is best effort: if `git` is
//! missing or the tree is not a checkout, the revision is simply absent.
//!
//! The resolved descriptor is written into the package tree as a small
//! Python module that the packaged library imports at runtime.

use crate::error::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Version file, relative to the project root
pub const VERSION_FILE: &str = "VERSION_NUMBER";

/// Immutable version information for one invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionDescriptor {
    version: String,
    revision: Option<String>,
}

impl VersionDescriptor {
    #[must_use]
    pub const fn new(version: String, revision: Option<String>) -> Self {
        Self { version, revision }
    }

    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }

    #[must_use]
    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    /// Python source for the generated version module
    #[must_use]
    pub fn render_module(&self) -> String {
        let revision = self
            .revision
            .as_deref()
            .map_or_else(|| "None".to_string(), python_string);
        format!(
            "# Generated by nativepack. Do not edit.\n\
             version = {}\n\
             git_version = {revision}\n",
            python_string(&self.version)
        )
    }
}

impl fmt::Display for VersionDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.revision {
            Some(revision) => write!(f, "{} ({revision})", self.version),
            None => f.write_str(&self.version),
        }
    }
}

/// Single-quoted Python string literal
fn python_string(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('\'', "\\'");
    format!("'{escaped}'")
}

/// Source of the current source-control revision
pub trait RevisionSource: fmt::Debug {
    /// Current revision of the tree at `project_root`, or `None` if unknown
    fn revision(&self, project_root: &Path) -> Option<String>;
}

/// Asks `git rev-parse HEAD`
#[derive(Debug, Clone, Copy, Default)]
pub struct GitRevision;

impl RevisionSource for GitRevision {
    fn revision(&self, project_root: &Path) -> Option<String> {
        let output = match Command::new("git")
            .args(["rev-parse", "HEAD"])
            .current_dir(project_root)
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                tracing::debug!("revision lookup unavailable: {e}");
                return None;
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::debug!("revision lookup failed: {}", stderr.trim());
            return None;
        }

        let revision = String::from_utf8_lossy(&output.stdout).trim().to_string();
        (!revision.is_empty()).then_some(revision)
    }
}

/// Read and trim the mandatory version file.
pub fn read_version_file(project_root: &Path) -> Result<String> {
    let path = project_root.join(VERSION_FILE);
    let contents = fs::read_to_string(&path).map_err(|e| {
        Error::config(format!("cannot read version file {}: {e}", path.display()))
    })?;

    let version = contents.trim();
    if version.is_empty() {
        return Err(Error::config(format!(
            "version file {} is empty",
            path.display()
        )));
    }
    Ok(version.to_string())
}

/// Resolves the version descriptor for a project
#[derive(Debug)]
pub struct VersionResolver {
    project_root: PathBuf,
    revision_source: Box<dyn RevisionSource>,
}

impl VersionResolver {
    /// Resolver that asks `git` for the revision
    #[must_use]
    pub fn new(project_root: impl Into<PathBuf>) -> Self {
        Self::with_revision_source(project_root, Box::new(GitRevision))
    }

    #[must_use]
    pub fn with_revision_source(
        project_root: impl Into<PathBuf>,
        revision_source: Box<dyn RevisionSource>,
    ) -> Self {
        Self {
            project_root: project_root.into(),
            revision_source,
        }
    }

    /// Resolve without touching the filesystem beyond reading the version file.
    pub fn resolve(&self) -> Result<VersionDescriptor> {
        let version = read_version_file(&self.project_root)?;
        let revision = self.revision_source.revision(&self.project_root);
        if revision.is_none() {
            tracing::debug!("no source-control revision; recording it as absent");
        }
        Ok(VersionDescriptor::new(version, revision))
    }

    /// Write the descriptor's module to `module_path`, relative to the project root.
    ///
    /// Overwrites any previous content and creates the parent directory.
    pub fn write_module(&self, descriptor: &VersionDescriptor, module_path: &Path) -> Result<PathBuf> {
        let path = self.project_root.join(module_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| Error::io(format!("Failed to create {}", parent.display()), e))?;
        }
        fs::write(&path, descriptor.render_module())
            .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))?;
        tracing::info!("wrote version {descriptor} to {}", path.display());
        Ok(path)
    }
}
