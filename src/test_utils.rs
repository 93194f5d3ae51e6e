//! Shared test utilities for nativepack tests
//!
//! Common fixtures and test doubles for the subprocess and environment
//! seams, so unit tests never need a real toolchain.

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::error::{Error, Result};
    use crate::extensions::runner::{CommandRunner, Invocation};
    use crate::extensions::types::{Stage, ToolStatus};
    use crate::interpreter::{InterpreterInfo, InterpreterProbe};
    use crate::version::{RevisionSource, VERSION_FILE};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Create a temporary project root containing `VERSION_NUMBER`
    pub(crate) fn project_with_version(contents: &str) -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(dir.path().join(VERSION_FILE), contents).expect("Failed to write version file");
        dir
    }

    /// Write an executable shell script named `name` that exits with `code`
    #[cfg(unix)]
    pub(crate) fn fake_tool(dir: &Path, name: &str, code: i32) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\nexit {code}\n")).expect("Failed to write tool");
        let mut perms = fs::metadata(&path).expect("tool metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("Failed to chmod tool");
        path
    }

    /// Revision source with a fixed answer
    #[derive(Debug, Clone, Default)]
    pub(crate) struct FixedRevision(pub(crate) Option<String>);

    impl RevisionSource for FixedRevision {
        fn revision(&self, _project_root: &Path) -> Option<String> {
            self.0.clone()
        }
    }

    /// Interpreter probe with a fixed answer
    #[derive(Debug, Clone)]
    pub(crate) struct FixedInterpreter;

    impl InterpreterProbe for FixedInterpreter {
        fn probe(&self) -> Result<InterpreterInfo> {
            Ok(InterpreterInfo {
                executable: PathBuf::from("/usr/bin/python3"),
                include_dir: PathBuf::from("/usr/include/python3.11"),
            })
        }
    }

    /// Interpreter probe that always fails
    #[derive(Debug, Clone)]
    pub(crate) struct NoInterpreter;

    impl InterpreterProbe for NoInterpreter {
        fn probe(&self) -> Result<InterpreterInfo> {
            Err(Error::config("no Python interpreter found"))
        }
    }

    /// Records every invocation instead of running it
    ///
    /// Optionally fails at one stage, or populates an install prefix with
    /// the package trees when the install stage runs.
    #[derive(Debug, Default)]
    pub(crate) struct RecordingRunner {
        pub(crate) calls: Vec<(Stage, Invocation)>,
        fail_at: Option<Stage>,
        populate: Option<PathBuf>,
    }

    impl RecordingRunner {
        pub(crate) fn failing_at(stage: Stage) -> Self {
            Self {
                fail_at: Some(stage),
                ..Self::default()
            }
        }

        pub(crate) fn populating(install_dir: &Path) -> Self {
            Self {
                populate: Some(install_dir.to_path_buf()),
                ..Self::default()
            }
        }

        pub(crate) fn count(&self, stage: Stage) -> usize {
            self.calls.iter().filter(|(s, _)| *s == stage).count()
        }
    }

    impl CommandRunner for RecordingRunner {
        fn run(&mut self, stage: Stage, invocation: &Invocation) -> Result<()> {
            self.calls.push((stage, invocation.clone()));

            if self.fail_at == Some(stage) {
                return Err(Error::BuildTool {
                    stage,
                    command: invocation.command_line(),
                    status: ToolStatus::Code(2),
                    output: format!("{stage} exploded\n"),
                });
            }

            if stage == Stage::Install
                && let Some(prefix) = &self.populate
            {
                for dir in ["caffe", "caffe2"] {
                    let package = prefix.join(dir);
                    fs::create_dir_all(&package).expect("Failed to create install tree");
                    fs::write(package.join("__init__.py"), format!("# {dir}\n"))
                        .expect("Failed to write install tree");
                }
            }

            Ok(())
        }
    }
}
