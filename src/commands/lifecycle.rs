//! Lifecycle commands
//!
//! `create-version`, `build-py`, `build-ext`, `build` and `develop`, run
//! through a [`LifecycleGate`] with the real subprocess runner.

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use nativepack::extensions::BUILD_STEPS;
use nativepack::{LifecycleCommand, LifecycleGate, LifecycleOutcome, Project, SystemRunner, Toolchain};
use std::path::PathBuf;

/// Command-line options shared by the lifecycle commands
#[derive(Debug, Default)]
pub(crate) struct LifecycleOptions {
    pub(crate) project_root: Option<PathBuf>,
    pub(crate) build_temp: Option<PathBuf>,
    pub(crate) build_lib: Option<PathBuf>,
    pub(crate) verbose: bool,
    pub(crate) quiet: bool,
}

/// Run one lifecycle command against the discovered project
pub(crate) fn run(
    command: &LifecycleCommand,
    toolchain: Toolchain,
    options: LifecycleOptions,
) -> Result<()> {
    command.ensure_supported()?;

    let project = Project::discover(options.project_root, options.build_temp, options.build_lib)
        .context("Failed to load project")?;
    let mut gate = LifecycleGate::new(project, toolchain);
    let mut runner = SystemRunner::new(options.verbose);

    let progress = if runs_native_build(command) && !(options.verbose || options.quiet) {
        Some(native_progress())
    } else {
        None
    };

    let result = gate.run(command, &mut runner, progress.as_ref());
    if let Some(bar) = &progress {
        bar.finish_and_clear();
    }
    let outcome = result.with_context(|| format!("`{}` failed", command.name()))?;

    if !options.quiet {
        for line in summarize(&outcome) {
            println!("{line}");
        }
    }

    Ok(())
}

const fn runs_native_build(command: &LifecycleCommand) -> bool {
    matches!(command, LifecycleCommand::BuildExt | LifecycleCommand::Build)
}

fn native_progress() -> ProgressBar {
    let progress = ProgressBar::new(BUILD_STEPS);
    let style = ProgressStyle::default_bar()
        .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .map_or_else(|_| ProgressStyle::default_bar(), |style| style.progress_chars("#>-"));
    progress.set_style(style);
    progress.set_message("Building native extension...");
    progress
}

/// User-facing lines describing what a command did
fn summarize(outcome: &LifecycleOutcome) -> Vec<String> {
    let mut lines = Vec::new();

    if let (Some(version), Some(path)) = (&outcome.version, &outcome.version_module) {
        lines.push(format!("Wrote version {version} to {}", path.display()));
    }

    if !outcome.collected.is_empty() {
        lines.push(format!(
            "Collected {} Python module(s)",
            outcome.collected.len()
        ));
    }

    if let Some(report) = &outcome.build {
        lines.push(format!(
            "Built {} in {:.2}s ({} file(s) copied)",
            report.extension,
            report.duration.as_secs_f64(),
            report.files_copied
        ));
        for output in &report.outputs {
            lines.push(format!("  {}", output.display()));
        }
    }

    lines
}
