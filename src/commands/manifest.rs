//! Manifest command
//!
//! Print the record handed to the packaging collaborator

use anyhow::{Context, Result};
use nativepack::{PackageManifest, Project, VersionResolver};
use std::path::PathBuf;

/// Resolve the version and print the manifest as JSON
pub(crate) fn run(project_root: Option<PathBuf>, pretty: bool) -> Result<()> {
    let project = Project::discover(project_root, None, None).context("Failed to load project")?;
    let version = VersionResolver::new(&project.root)
        .resolve()
        .context("Failed to resolve package version")?;

    let manifest = PackageManifest::assemble(&project.config, &version);
    let json = manifest
        .to_json(pretty)
        .context("Failed to serialize manifest")?;
    println!("{json}");

    Ok(())
}
