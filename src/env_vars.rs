//! Build environment variable handling.
//!
//! Each accessor reads one variable. Empty values count as unset so that
//! `CMAKE_BUILD_DIR= nativepack build-ext` falls back to the default.

use std::env;

fn non_empty(var: &str) -> Option<String> {
    env::var(var).ok().filter(|value| !value.trim().is_empty())
}

/// Extra `cmake` configure arguments (`CMAKE_ARGS`), shell-quoted.
pub fn cmake_args() -> Option<String> {
    non_empty("CMAKE_ARGS")
}

/// Build directory override (`CMAKE_BUILD_DIR`).
pub fn cmake_build_dir() -> Option<String> {
    non_empty("CMAKE_BUILD_DIR")
}

/// Install prefix override (`CMAKE_INSTALL_DIR`).
pub fn cmake_install_dir() -> Option<String> {
    non_empty("CMAKE_INSTALL_DIR")
}

/// Interpreter override (`PYTHON_EXECUTABLE`).
pub fn python_executable() -> Option<String> {
    non_empty("PYTHON_EXECUTABLE")
}
