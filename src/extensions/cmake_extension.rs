//! `CMake` native build orchestration
//!
//! Builds the package's native core with a single `CMake` project rooted at
//! the top of the repository, then copies the installed package trees into
//! the package output directory.
//!
//! Build process:
//! ```bash
//! mkdir -p $CMAKE_BUILD_DIR
//! cd $CMAKE_BUILD_DIR
//! cmake -DBUILD_SHARED_LIBS=OFF ... $PROJECT_ROOT $CMAKE_ARGS
//! make -j$((NPROC + 1))
//! make install
//! cp -r $CMAKE_INSTALL_DIR/{caffe,caffe2} $BUILD_LIB/
//! ```

use super::artifacts::ArtifactSet;
use super::runner::{CommandRunner, Invocation};
use super::types::{BuildReport, ExtensionUnit, Stage};
use crate::build_config::BuildConfiguration;
use crate::error::{Error, Result};
use crate::preflight::Toolchain;
use indicatif::ProgressBar;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Drives configure -> compile -> install -> artifact assembly
#[derive(Debug, Clone)]
pub struct NativeBuildOrchestrator {
    toolchain: Toolchain,
    /// Top-level `CMake` project directory
    project_root: PathBuf,
    /// Package output directory artifacts are copied into
    build_lib: PathBuf,
}

impl NativeBuildOrchestrator {
    #[must_use]
    pub fn new(toolchain: Toolchain, project_root: PathBuf, build_lib: PathBuf) -> Self {
        Self {
            toolchain,
            project_root,
            build_lib,
        }
    }

    /// `cmake` invocation: fixed arguments, project root, then user arguments.
    #[must_use]
    pub fn configure_invocation(&self, config: &BuildConfiguration) -> Invocation {
        let mut args = vec![
            "-DBUILD_SHARED_LIBS=OFF".to_string(),
            "-DUSE_GLOO=OFF".to_string(),
            format!(
                "-DCMAKE_INSTALL_PREFIX:PATH={}",
                config.install_dir.display()
            ),
            format!(
                "-DPYTHON_EXECUTABLE:FILEPATH={}",
                config.interpreter_path.display()
            ),
            format!("-DPYTHON_INCLUDE_DIR={}", config.include_dir.display()),
            "-DBUILD_TEST=OFF".to_string(),
            "-DBUILD_BENCHMARK=OFF".to_string(),
            "-DBUILD_BINARY=OFF".to_string(),
            self.project_root.display().to_string(),
        ];
        args.extend(config.extra_args.iter().cloned());

        Invocation::new(&self.toolchain.generator, args, &config.build_dir)
    }

    /// `make -jN` invocation
    #[must_use]
    pub fn compile_invocation(&self, config: &BuildConfiguration) -> Invocation {
        Invocation::new(
            &self.toolchain.driver,
            vec![format!("-j{}", config.parallelism)],
            &config.build_dir,
        )
    }

    /// `make install` invocation
    #[must_use]
    pub fn install_invocation(&self, config: &BuildConfiguration) -> Invocation {
        Invocation::new(
            &self.toolchain.driver,
            vec!["install".to_string()],
            &config.build_dir,
        )
    }

    /// Artifact set for a configuration's install prefix
    #[must_use]
    pub fn artifacts(&self, config: &BuildConfiguration) -> ArtifactSet {
        ArtifactSet::standard(&config.install_dir, &self.build_lib)
    }

    /// Package output directories a successful build populates
    #[must_use]
    pub fn outputs(&self) -> Vec<PathBuf> {
        ArtifactSet::standard(Path::new(""), &self.build_lib).destinations()
    }

    /// Run the full native build.
    ///
    /// Exactly one extension unit must be registered; anything else fails
    /// before any directory is created or any tool is started. The first
    /// failing stage aborts the build and later stages never run. Partial
    /// output of an aborted build is left on disk.
    pub fn build(
        &self,
        units: &[ExtensionUnit],
        config: &BuildConfiguration,
        runner: &mut dyn CommandRunner,
        progress: Option<&ProgressBar>,
    ) -> Result<BuildReport> {
        let unit = single_unit(units)?;
        let start_time = Instant::now();

        fs::create_dir_all(&config.build_dir).map_err(|e| {
            Error::io(
                format!(
                    "Failed to create build directory {}",
                    config.build_dir.display()
                ),
                e,
            )
        })?;

        let steps = [
            (Stage::Configure, self.configure_invocation(config)),
            (Stage::Compile, self.compile_invocation(config)),
            (Stage::Install, self.install_invocation(config)),
        ];
        for (stage, invocation) in &steps {
            if let Some(bar) = progress {
                bar.set_message(format!("{stage}: {}", invocation.program.display()));
            }
            runner.run(*stage, invocation)?;
            if let Some(bar) = progress {
                bar.inc(1);
            }
        }

        if let Some(bar) = progress {
            bar.set_message("assembling artifacts");
        }
        let artifacts = self.artifacts(config);
        let files_copied = artifacts.assemble()?;
        if let Some(bar) = progress {
            bar.inc(1);
        }

        Ok(BuildReport {
            extension: unit.name.clone(),
            duration: start_time.elapsed(),
            outputs: artifacts.destinations(),
            files_copied,
        })
    }
}

/// Number of progress steps [`NativeBuildOrchestrator::build`] reports
pub const BUILD_STEPS: u64 = 4;

/// The one registered unit, or a configuration error
fn single_unit(units: &[ExtensionUnit]) -> Result<&ExtensionUnit> {
    match units {
        [unit] => Ok(unit),
        _ => Err(Error::config(format!(
            "expected exactly one native extension unit, found {} ({}); \
             the whole native build is a single CMake project",
            units.len(),
            units
                .iter()
                .map(|u| u.name.as_str())
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}
