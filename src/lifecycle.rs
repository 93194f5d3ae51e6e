//! Packaging lifecycle commands
//!
//! The packaging flow is a fixed set of named commands. Each one is a plain
//! function of the project state; ordering rules live here rather than in
//! the individual steps:
//!
//! - `build-py` always generates the version module before collecting sources
//! - `build` is `build-py` followed by `build-ext`
//! - the version module is written at most once per [`LifecycleGate`]
//! - `develop` is rejected outright

use crate::build_config::{BuildConfiguration, BuildEnv};
use crate::config::ProjectConfig;
use crate::error::{Error, Result};
use crate::extensions::cmake_extension::NativeBuildOrchestrator;
use crate::extensions::runner::CommandRunner;
use crate::extensions::types::BuildReport;
use crate::interpreter::{InterpreterProbe, SystemInterpreter};
use crate::paths;
use crate::preflight::Toolchain;
use crate::sources;
use crate::version::{RevisionSource, VersionDescriptor, VersionResolver};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};

/// A packaging command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LifecycleCommand {
    /// Write the generated version module
    CreateVersion,
    /// Generate the version module, then collect Python sources
    BuildPy,
    /// Run the native build and assemble its artifacts
    BuildExt,
    /// `build-py` then `build-ext`
    Build,
    /// In-place development install; never supported
    Develop { args: Vec<String> },
}

impl LifecycleCommand {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::CreateVersion => "create-version",
            Self::BuildPy => "build-py",
            Self::BuildExt => "build-ext",
            Self::Build => "build",
            Self::Develop { .. } => "develop",
        }
    }

    /// One-line description of what the command does in this package
    #[must_use]
    pub const fn summary(&self) -> &'static str {
        match self {
            Self::CreateVersion => "writes the generated version module",
            Self::BuildPy => "writes the version module, then collects Python sources",
            Self::BuildExt => "runs cmake, make, make install and copies the package trees",
            Self::Build => "build-py followed by build-ext",
            Self::Develop { .. } => "disabled: native builds cannot be installed in place",
        }
    }

    /// Fail with [`Error::UnsupportedMode`] for commands that never run.
    ///
    /// Callers check this before touching the project, so `develop` is
    /// rejected even when the project itself cannot be loaded.
    pub fn ensure_supported(&self) -> Result<()> {
        match self {
            Self::Develop { .. } => Err(Error::UnsupportedMode {
                command: self.name().to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Every command, with `develop` carrying no arguments
    #[must_use]
    pub fn all() -> [Self; 5] {
        [
            Self::CreateVersion,
            Self::BuildPy,
            Self::BuildExt,
            Self::Build,
            Self::Develop { args: Vec::new() },
        ]
    }
}

/// Where a project lives and where its build goes
#[derive(Debug, Clone)]
pub struct Project {
    pub root: PathBuf,
    pub config: ProjectConfig,
    /// Scratch space for the native build
    pub build_temp: PathBuf,
    /// Package output directory
    pub build_lib: PathBuf,
}

impl Project {
    /// Locate the project and load its config.
    ///
    /// Unset directories fall back to [`paths`] defaults. All paths are made
    /// absolute because the native build runs from inside the build directory.
    pub fn discover(
        root: Option<PathBuf>,
        build_temp: Option<PathBuf>,
        build_lib: Option<PathBuf>,
    ) -> Result<Self> {
        let root = absolute(root.unwrap_or_else(paths::find_project_root));
        let config = ProjectConfig::load(&root)?;
        let build_temp = absolute(build_temp.unwrap_or_else(|| paths::default_build_temp(&root)));
        let build_lib = absolute(build_lib.unwrap_or_else(|| paths::default_build_lib(&root)));
        tracing::debug!(
            "project {} (build_temp {}, build_lib {})",
            root.display(),
            build_temp.display(),
            build_lib.display()
        );
        Ok(Self {
            root,
            config,
            build_temp,
            build_lib,
        })
    }

    /// Generated version module path, relative to the root
    #[must_use]
    pub fn version_module(&self) -> &Path {
        &self.config.package.version_module
    }
}

fn absolute(path: PathBuf) -> PathBuf {
    std::path::absolute(&path).unwrap_or(path)
}

/// Everything the native build reads from the ambient environment
#[derive(Debug)]
pub struct BuildInputs {
    pub env: BuildEnv,
    pub processor_count: usize,
    pub interpreter: Box<dyn InterpreterProbe>,
}

impl BuildInputs {
    /// Capture the process environment and processor count now.
    #[must_use]
    pub fn from_environment() -> Self {
        Self {
            env: BuildEnv::capture(),
            processor_count: num_cpus::get(),
            interpreter: Box::new(SystemInterpreter),
        }
    }

    /// Resolve the build configuration for a scratch directory
    pub fn resolve(&self, build_temp: &Path) -> Result<BuildConfiguration> {
        let interpreter = self.interpreter.probe()?;
        BuildConfiguration::resolve(&self.env, &interpreter, build_temp, self.processor_count)
    }
}

/// What a command produced
#[derive(Debug, Default)]
pub struct LifecycleOutcome {
    /// Version written by this command, if it wrote one
    pub version: Option<VersionDescriptor>,
    /// Path of the version module, if this command wrote it
    pub version_module: Option<PathBuf>,
    /// Python modules collected into the package output
    pub collected: Vec<PathBuf>,
    /// Native build result
    pub build: Option<BuildReport>,
}

/// Runs lifecycle commands for one packaging invocation
#[derive(Debug)]
pub struct LifecycleGate {
    project: Project,
    toolchain: Toolchain,
    resolver: VersionResolver,
    inputs: BuildInputs,
    /// Set once the version module has been written
    version_written: bool,
}

impl LifecycleGate {
    #[must_use]
    pub fn new(project: Project, toolchain: Toolchain) -> Self {
        let resolver = VersionResolver::new(&project.root);
        Self {
            project,
            toolchain,
            resolver,
            inputs: BuildInputs::from_environment(),
            version_written: false,
        }
    }

    #[must_use]
    pub fn with_revision_source(mut self, revision_source: Box<dyn RevisionSource>) -> Self {
        self.resolver = VersionResolver::with_revision_source(&self.project.root, revision_source);
        self
    }

    #[must_use]
    pub fn with_build_inputs(mut self, inputs: BuildInputs) -> Self {
        self.inputs = inputs;
        self
    }

    #[must_use]
    pub const fn project(&self) -> &Project {
        &self.project
    }

    /// Run one command to completion.
    pub fn run(
        &mut self,
        command: &LifecycleCommand,
        runner: &mut dyn CommandRunner,
        progress: Option<&ProgressBar>,
    ) -> Result<LifecycleOutcome> {
        tracing::debug!("lifecycle command {}", command.name());
        let mut outcome = LifecycleOutcome::default();

        command.ensure_supported()?;
        match command {
            LifecycleCommand::Develop { .. } => {}
            LifecycleCommand::CreateVersion => self.create_version(&mut outcome)?,
            LifecycleCommand::BuildPy => self.build_py(&mut outcome)?,
            LifecycleCommand::BuildExt => self.build_ext(runner, progress, &mut outcome)?,
            LifecycleCommand::Build => {
                self.build_py(&mut outcome)?;
                self.build_ext(runner, progress, &mut outcome)?;
            }
        }

        Ok(outcome)
    }

    fn create_version(&mut self, outcome: &mut LifecycleOutcome) -> Result<()> {
        if self.version_written {
            tracing::debug!("version module already written in this invocation");
            return Ok(());
        }
        let descriptor = self.resolver.resolve()?;
        let path = self
            .resolver
            .write_module(&descriptor, self.project.version_module())?;
        self.version_written = true;
        outcome.version = Some(descriptor);
        outcome.version_module = Some(path);
        Ok(())
    }

    fn build_py(&mut self, outcome: &mut LifecycleOutcome) -> Result<()> {
        self.create_version(outcome)?;
        outcome.collected = sources::collect_sources(
            &self.project.root,
            &self.project.config.package.packages,
            &self.project.build_lib,
        )?;
        Ok(())
    }

    fn build_ext(
        &self,
        runner: &mut dyn CommandRunner,
        progress: Option<&ProgressBar>,
        outcome: &mut LifecycleOutcome,
    ) -> Result<()> {
        let config = self.inputs.resolve(&self.project.build_temp)?;
        let orchestrator = NativeBuildOrchestrator::new(
            self.toolchain.clone(),
            self.project.root.clone(),
            self.project.build_lib.clone(),
        );
        let report = orchestrator.build(
            &self.project.config.extensions,
            &config,
            runner,
            progress,
        )?;
        outcome.build = Some(report);
        Ok(())
    }
}
