//! Path utilities for project and build directory detection.

use crate::config::CONFIG_FILE;
use crate::version::VERSION_FILE;
use std::env;
use std::path::{Path, PathBuf};

/// Find the project root by walking up from `start`.
/// The first directory containing `VERSION_NUMBER` or `nativepack.toml` wins;
/// defaults to `start` itself if no ancestor has either.
#[must_use]
pub fn find_project_root_from(start: &Path) -> PathBuf {
    start
        .ancestors()
        .find(|dir| dir.join(VERSION_FILE).is_file() || dir.join(CONFIG_FILE).is_file())
        .unwrap_or(start)
        .to_path_buf()
}

/// Find the project root starting from the current directory.
#[must_use]
pub fn find_project_root() -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    find_project_root_from(&cwd)
}

/// Host platform tag used to name build directories, e.g. `linux-x86_64`.
#[must_use]
pub fn platform_tag() -> String {
    let os = match env::consts::OS {
        "macos" => "macosx",
        "windows" => "win",
        other => other,
    };
    format!("{os}-{}", env::consts::ARCH)
}

/// Default scratch directory for the native build: `<root>/build/temp.<platform>`.
#[must_use]
pub fn default_build_temp(project_root: &Path) -> PathBuf {
    project_root
        .join("build")
        .join(format!("temp.{}", platform_tag()))
}

/// Default package output directory: `<root>/build/lib.<platform>`.
#[must_use]
pub fn default_build_lib(project_root: &Path) -> PathBuf {
    project_root
        .join("build")
        .join(format!("lib.{}", platform_tag()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn root_found_from_nested_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(VERSION_FILE), "1.0").unwrap();
        let nested = dir.path().join("caffe2/python");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root_from(&nested), dir.path());
    }

    #[test]
    fn config_file_marks_root() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "").unwrap();
        let nested = dir.path().join("src");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_project_root_from(&nested), dir.path());
    }

    #[test]
    fn no_marker_defaults_to_start() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a/b");
        fs::create_dir_all(&nested).unwrap();

        // Ancestors above the temp dir might carry a marker on odd hosts; the
        // result is at least never below `start`.
        let root = find_project_root_from(&nested);
        assert!(nested.starts_with(&root));
    }

    #[test]
    fn build_dirs_carry_platform() {
        let root = Path::new("/project");
        let tag = platform_tag();
        assert!(tag.contains('-'));
        assert_eq!(
            default_build_temp(root),
            PathBuf::from(format!("/project/build/temp.{tag}"))
        );
        assert_eq!(
            default_build_lib(root),
            PathBuf::from(format!("/project/build/lib.{tag}"))
        );
    }
}
