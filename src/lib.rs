//! Nativepack internal library code
//!
//! Orchestrates packaging of a Python package whose native core is built
//! by an external `CMake` + `make` toolchain.

pub mod build_config;
pub mod config;
pub mod debug;
pub mod env_vars;
pub mod error;
pub mod extensions;
pub mod interpreter;
pub mod lifecycle;
pub mod manifest;
pub mod paths;
pub mod preflight;
pub mod sources;
pub mod version;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export common types for convenience
pub use build_config::{BuildConfiguration, BuildEnv, split_cmake_args};
pub use config::{CONFIG_FILE, ProjectConfig};
pub use debug::init_debug;
pub use error::{Error, Result};
pub use extensions::{
    ArtifactSet, BuildReport, CommandRunner, ExtensionUnit, Invocation, NativeBuildOrchestrator,
    Stage, SystemRunner, ToolStatus,
};
pub use interpreter::{InterpreterInfo, InterpreterProbe, SystemInterpreter};
pub use lifecycle::{BuildInputs, LifecycleCommand, LifecycleGate, LifecycleOutcome, Project};
pub use manifest::PackageManifest;
pub use paths::{find_project_root, find_project_root_from};
pub use preflight::Toolchain;
pub use version::{GitRevision, RevisionSource, VERSION_FILE, VersionDescriptor, VersionResolver};
