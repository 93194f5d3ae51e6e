//! Native extension building
//!
//! The package's native core is one `CMake` project. It is registered as a
//! single opaque [`ExtensionUnit`] and built by
//! [`NativeBuildOrchestrator`] in four blocking steps:
//! - configure (`cmake`)
//! - compile (`make -jN`)
//! - install (`make install`)
//! - artifact assembly (copy installed package trees into the output)

pub mod artifacts;
pub mod cmake_extension;
pub mod runner;
pub mod types;

pub use artifacts::{ARTIFACT_DIRS, ArtifactMapping, ArtifactSet, copy_tree};
pub use cmake_extension::{BUILD_STEPS, NativeBuildOrchestrator};
pub use runner::{CommandRunner, Invocation, SystemRunner};
pub use types::{BuildReport, ExtensionUnit, Stage, ToolStatus};
