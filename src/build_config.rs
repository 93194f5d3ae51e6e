//! Build configuration resolution
//!
//! The environment is captured once into a [`BuildEnv`] and resolved into a
//! [`BuildConfiguration`] that is passed explicitly through every build
//! step. Nothing reads the environment again mid-build.

use crate::env_vars;
use crate::error::{Error, Result};
use crate::interpreter::InterpreterInfo;
use std::path::{Path, PathBuf};

/// Snapshot of the environment overrides that affect the native build
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildEnv {
    /// Raw `CMAKE_ARGS` value
    pub cmake_args: Option<String>,
    /// `CMAKE_BUILD_DIR` override
    pub build_dir: Option<PathBuf>,
    /// `CMAKE_INSTALL_DIR` override
    pub install_dir: Option<PathBuf>,
}

impl BuildEnv {
    /// Read the overrides from the process environment.
    ///
    /// Relative directory overrides are anchored at the current directory.
    #[must_use]
    pub fn capture() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self {
            cmake_args: env_vars::cmake_args(),
            build_dir: env_vars::cmake_build_dir().map(PathBuf::from),
            install_dir: env_vars::cmake_install_dir().map(PathBuf::from),
        }
        .anchored(&cwd)
    }

    /// Resolve relative directory overrides against `base`.
    #[must_use]
    pub fn anchored(self, base: &Path) -> Self {
        let anchor = |dir: PathBuf| {
            if dir.is_absolute() {
                dir
            } else {
                base.join(dir)
            }
        };
        Self {
            cmake_args: self.cmake_args,
            build_dir: self.build_dir.map(anchor),
            install_dir: self.install_dir.map(anchor),
        }
    }
}

/// Parameters for one native build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfiguration {
    /// Staging prefix passed to `CMAKE_INSTALL_PREFIX`
    pub install_dir: PathBuf,
    /// Directory `cmake` generates build files into
    pub build_dir: PathBuf,
    /// User arguments appended after the fixed configure arguments
    pub extra_args: Vec<String>,
    /// Interpreter the package is built for
    pub interpreter_path: PathBuf,
    /// Interpreter header directory
    pub include_dir: PathBuf,
    /// `make -j` value
    pub parallelism: usize,
}

impl BuildConfiguration {
    /// Resolve a configuration from captured inputs.
    ///
    /// `processor_count` is the number of local processing units; the build
    /// driver always gets one more job than that.
    pub fn resolve(
        env: &BuildEnv,
        interpreter: &InterpreterInfo,
        build_temp: &Path,
        processor_count: usize,
    ) -> Result<Self> {
        let install_dir = env
            .install_dir
            .clone()
            .unwrap_or_else(|| build_temp.join("cmake_install"));
        let build_dir = env
            .build_dir
            .clone()
            .unwrap_or_else(|| build_temp.join("cmake_build"));
        let extra_args = split_cmake_args(env.cmake_args.as_deref())?;
        tracing::info!("CMAKE_ARGS: {extra_args:?}");

        Ok(Self {
            install_dir,
            build_dir,
            extra_args,
            interpreter_path: interpreter.executable.clone(),
            include_dir: interpreter.include_dir.clone(),
            parallelism: processor_count + 1,
        })
    }
}

/// Tokenize `CMAKE_ARGS` with POSIX shell word splitting.
pub fn split_cmake_args(raw: Option<&str>) -> Result<Vec<String>> {
    let Some(raw) = raw else {
        return Ok(Vec::new());
    };
    shlex::split(raw).ok_or_else(|| {
        Error::config(format!("CMAKE_ARGS is not valid shell syntax: {raw}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interpreter() -> InterpreterInfo {
        InterpreterInfo {
            executable: PathBuf::from("/usr/bin/python3"),
            include_dir: PathBuf::from("/usr/include/python3.11"),
        }
    }

    #[test]
    fn defaults_derive_from_build_temp() {
        let config = BuildConfiguration::resolve(
            &BuildEnv::default(),
            &interpreter(),
            Path::new("/work/build/temp"),
            8,
        )
        .unwrap();

        assert_eq!(config.install_dir, PathBuf::from("/work/build/temp/cmake_install"));
        assert_eq!(config.build_dir, PathBuf::from("/work/build/temp/cmake_build"));
        assert!(config.extra_args.is_empty());
        assert_eq!(config.interpreter_path, PathBuf::from("/usr/bin/python3"));
        assert_eq!(config.include_dir, PathBuf::from("/usr/include/python3.11"));
    }

    #[test]
    fn parallelism_is_processor_count_plus_one() {
        for count in [1, 4, 16] {
            let config = BuildConfiguration::resolve(
                &BuildEnv::default(),
                &interpreter(),
                Path::new("/tmp"),
                count,
            )
            .unwrap();
            assert_eq!(config.parallelism, count + 1);
        }
    }

    #[test]
    fn overrides_win() {
        let env = BuildEnv {
            cmake_args: Some("-DUSE_CUDA=ON -DCMAKE_BUILD_TYPE=Release".to_string()),
            build_dir: Some(PathBuf::from("/custom/build")),
            install_dir: Some(PathBuf::from("/custom/install")),
        };
        let config =
            BuildConfiguration::resolve(&env, &interpreter(), Path::new("/tmp"), 2).unwrap();

        assert_eq!(config.build_dir, PathBuf::from("/custom/build"));
        assert_eq!(config.install_dir, PathBuf::from("/custom/install"));
        assert_eq!(
            config.extra_args,
            ["-DUSE_CUDA=ON", "-DCMAKE_BUILD_TYPE=Release"]
        );
    }

    #[test]
    fn relative_overrides_are_anchored() {
        let env = BuildEnv {
            cmake_args: Some("-DX=1".to_string()),
            build_dir: Some(PathBuf::from("out/build")),
            install_dir: Some(PathBuf::from("/abs/install")),
        }
        .anchored(Path::new("/work"));

        assert_eq!(env.build_dir, Some(PathBuf::from("/work/out/build")));
        assert_eq!(env.install_dir, Some(PathBuf::from("/abs/install")));
        assert_eq!(env.cmake_args.as_deref(), Some("-DX=1"));

        let config =
            BuildConfiguration::resolve(&env, &interpreter(), Path::new("/tmp"), 1).unwrap();
        assert!(config.build_dir.is_absolute());
        assert!(config.install_dir.is_absolute());
    }

    #[test]
    fn cmake_args_respect_quotes() {
        let args = split_cmake_args(Some(r#"-DCMAKE_CXX_FLAGS="-O2 -g" '-DNAME=a b'"#)).unwrap();
        assert_eq!(args, ["-DCMAKE_CXX_FLAGS=-O2 -g", "-DNAME=a b"]);
    }

    #[test]
    fn unbalanced_quote_is_rejected() {
        let err = split_cmake_args(Some(r#"-DFOO="unterminated"#)).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn unset_cmake_args_is_empty() {
        assert!(split_cmake_args(None).unwrap().is_empty());
        assert!(split_cmake_args(Some("   ")).unwrap().is_empty());
    }
}
