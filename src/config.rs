//! Project configuration
//!
//! Static package metadata lives in an optional `nativepack.toml` at the
//! project root. Every key has a default, so a project with only a
//! `VERSION_NUMBER` file builds as the stock `caffe2` package.
//!
//! ```toml
//! [package]
//! name = "caffe2"
//! version_module = "caffe2/version.py"
//! packages = ["caffe2", "caffe2.python"]
//!
//! [dependencies]
//! install = ["numpy", "protobuf"]
//!
//! [[extension]]
//! name = "caffe2-ext"
//! ```

use crate::error::{Error, Result};
use crate::extensions::types::ExtensionUnit;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Config file name, relative to the project root
pub const CONFIG_FILE: &str = "nativepack.toml";

/// Contents of `nativepack.toml`
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    pub package: PackageSection,

    pub dependencies: DependencySection,

    /// Registered native extension units
    #[serde(rename = "extension")]
    pub extensions: Vec<ExtensionUnit>,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            package: PackageSection::default(),
            dependencies: DependencySection::default(),
            extensions: vec![ExtensionUnit::default()],
        }
    }
}

/// `[package]` metadata
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PackageSection {
    pub name: String,
    pub description: String,
    pub url: String,
    pub author: String,
    pub author_email: String,

    /// Generated version module, relative to the project root
    pub version_module: PathBuf,

    /// Dotted Python package names collected by `build-py`
    pub packages: Vec<String>,
}

impl Default for PackageSection {
    fn default() -> Self {
        Self {
            name: "caffe2".to_string(),
            description: "Caffe2".to_string(),
            url: "https://github.com/caffe2/caffe2".to_string(),
            author: "jiayq".to_string(),
            author_email: "jiayq@fb.com".to_string(),
            version_module: PathBuf::from("caffe2/version.py"),
            packages: Vec::new(),
        }
    }
}

/// `[dependencies]` declarations, passed through to the manifest untouched
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct DependencySection {
    pub install: Vec<String>,
    pub setup: Vec<String>,
    pub tests: Vec<String>,
}

impl Default for DependencySection {
    fn default() -> Self {
        let list = |names: &[&str]| -> Vec<String> {
            names.iter().map(ToString::to_string).collect()
        };
        Self {
            install: list(&[
                "protobuf",
                "numpy",
                "flask",
                "future",
                "graphviz",
                "hypothesis",
                "jupyter",
                "matplotlib",
                "pydot",
                "python-nvd3",
                "pyyaml",
                "requests",
                "scikit-image",
                "scipy",
                "setuptools",
                "six",
                "tornado",
            ]),
            setup: list(&["pytest-runner"]),
            tests: list(&["pytest-cov", "hypothesis"]),
        }
    }
}

impl ProjectConfig {
    /// Load `nativepack.toml` from `project_root`, or defaults if it is absent.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the file exists but cannot be read
    /// or parsed.
    pub fn load(project_root: &Path) -> Result<Self> {
        let path = project_root.join(CONFIG_FILE);
        if !path.exists() {
            tracing::debug!("no {CONFIG_FILE}; using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&path)
            .map_err(|e| Error::config(format!("cannot read {}: {e}", path.display())))?;
        Self::parse(&content)
            .map_err(|e| Error::config(format!("invalid {}: {e}", path.display())))
    }

    /// Parse config file contents.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
