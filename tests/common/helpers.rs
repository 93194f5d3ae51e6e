//! Shared test helpers and utilities

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Path to the nativepack binary under test
pub(crate) fn get_nativepack_binary() -> &'static str {
    env!("CARGO_BIN_EXE_nativepack")
}

/// `cmake` stand-in: records its arguments and install prefix in its cwd
pub(crate) const FAKE_CMAKE: &str = r#"#!/bin/sh
printf '%s\n' "$@" > cmake-args.txt
for arg in "$@"; do
  case "$arg" in
    -DCMAKE_INSTALL_PREFIX:PATH=*) printf '%s' "${arg#*=}" > install-prefix.txt ;;
  esac
done
echo "-- Configuring done"
"#;

/// `make` stand-in: records each call; `install` populates the prefix
pub(crate) const FAKE_MAKE: &str = r##"#!/bin/sh
echo "make $*" >> make-calls.txt
if [ "$1" = "install" ]; then
  prefix=$(cat install-prefix.txt)
  mkdir -p "$prefix/caffe/proto" "$prefix/caffe2/python"
  echo "# caffe" > "$prefix/caffe/__init__.py"
  echo "# caffe proto" > "$prefix/caffe/proto/__init__.py"
  echo "# caffe2" > "$prefix/caffe2/__init__.py"
  echo "# caffe2 python" > "$prefix/caffe2/python/__init__.py"
fi
"##;

/// `make` stand-in whose compile step fails
pub(crate) const FAILING_MAKE: &str = r#"#!/bin/sh
echo "make $*" >> make-calls.txt
case "$1" in
  -j*) echo "error: compile broke" >&2; exit 2 ;;
esac
"#;

/// `git` stand-in that never knows the revision
pub(crate) const NO_GIT: &str = "#!/bin/sh\nexit 128\n";

/// Interpreter stand-in that reports a fixed include directory
pub(crate) const FAKE_PYTHON: &str = "#!/bin/sh\necho /opt/fake/include/python3.11\n";

/// A temporary project root plus a private directory of fake tools
pub(crate) struct TestProject {
    dir: TempDir,
    bin: TempDir,
}

impl TestProject {
    /// Project root containing `VERSION_NUMBER`
    pub(crate) fn new(version: &str) -> Self {
        let dir = TempDir::new().expect("Failed to create project dir");
        let bin = TempDir::new().expect("Failed to create bin dir");
        fs::write(dir.path().join("VERSION_NUMBER"), version).expect("Failed to write VERSION_NUMBER");
        let project = Self { dir, bin };
        project.install_tool("git", NO_GIT);
        project.install_tool("python3", FAKE_PYTHON);
        project
    }

    /// Project with working fake `cmake` and `make`
    #[allow(dead_code)]
    pub(crate) fn with_toolchain(version: &str) -> Self {
        let project = Self::new(version);
        project.install_tool("cmake", FAKE_CMAKE);
        project.install_tool("make", FAKE_MAKE);
        project
    }

    pub(crate) fn root(&self) -> &Path {
        self.dir.path()
    }

    pub(crate) fn bin_dir(&self) -> &Path {
        self.bin.path()
    }

    /// Scratch directory passed as `--build-temp`
    #[allow(dead_code)]
    pub(crate) fn build_temp(&self) -> PathBuf {
        self.root().join("out/temp")
    }

    /// Package output directory passed as `--build-lib`
    #[allow(dead_code)]
    pub(crate) fn build_lib(&self) -> PathBuf {
        self.root().join("out/lib")
    }

    /// Directory the fake tools run in
    #[allow(dead_code)]
    pub(crate) fn cmake_build_dir(&self) -> PathBuf {
        self.build_temp().join("cmake_build")
    }

    /// Write an executable script into the private bin directory
    pub(crate) fn install_tool(&self, name: &str, script: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = self.bin_dir().join(name);
        fs::write(&path, script).expect("Failed to write tool");
        let mut perms = fs::metadata(&path).expect("tool metadata").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&path, perms).expect("Failed to chmod tool");
        path
    }

    /// Command for the binary, run from the project root with the fake
    /// tools first on `PATH` and no build overrides inherited
    pub(crate) fn command(&self) -> Command {
        let path = format!("{}:/usr/bin:/bin", self.bin_dir().display());
        let mut command = Command::new(get_nativepack_binary());
        command
            .current_dir(self.root())
            .env("PATH", path)
            .env("PYTHON_EXECUTABLE", self.bin_dir().join("python3"))
            .env_remove("CMAKE_ARGS")
            .env_remove("CMAKE_BUILD_DIR")
            .env_remove("CMAKE_INSTALL_DIR")
            .env_remove("RUST_LOG");
        command
    }

    /// Like [`Self::command`] but with only the private bin directory on `PATH`
    #[allow(dead_code)]
    pub(crate) fn isolated_command(&self) -> Command {
        let mut command = self.command();
        command.env("PATH", self.bin_dir());
        command
    }

    /// Native build flags pointing at [`Self::build_temp`] and [`Self::build_lib`]
    #[allow(dead_code)]
    pub(crate) fn build_dir_args(&self) -> Vec<String> {
        vec![
            "--build-temp".to_string(),
            self.build_temp().display().to_string(),
            "--build-lib".to_string(),
            self.build_lib().display().to_string(),
        ]
    }
}
