//! Package manifest
//!
//! The record handed to the external packaging collaborator: static
//! metadata, the resolved version, the registered extension units and the
//! lifecycle command overrides. Assembly only; nothing is validated here.

use crate::config::ProjectConfig;
use crate::lifecycle::LifecycleCommand;
use crate::version::VersionDescriptor;
use serde::Serialize;

/// A command override as seen by the packaging collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandOverride {
    pub name: String,
    pub behavior: String,
}

/// Manifest record for the packaging collaborator
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackageManifest {
    pub name: String,
    pub version: String,
    pub description: String,
    pub url: String,
    pub author: String,
    pub author_email: String,
    /// Registered native extension unit names
    pub ext_modules: Vec<String>,
    pub cmdclass: Vec<CommandOverride>,
    pub packages: Vec<String>,
    pub install_requires: Vec<String>,
    pub setup_requires: Vec<String>,
    pub tests_require: Vec<String>,
}

impl PackageManifest {
    /// Assemble the manifest from project config and a resolved version.
    ///
    /// Dependency lists are sorted and de-duplicated.
    #[must_use]
    pub fn assemble(config: &ProjectConfig, version: &VersionDescriptor) -> Self {
        let package = &config.package;
        Self {
            name: package.name.clone(),
            version: version.version().to_string(),
            description: package.description.clone(),
            url: package.url.clone(),
            author: package.author.clone(),
            author_email: package.author_email.clone(),
            ext_modules: config.extensions.iter().map(|e| e.name.clone()).collect(),
            cmdclass: LifecycleCommand::all()
                .iter()
                .map(|command| CommandOverride {
                    name: command.name().to_string(),
                    behavior: command.summary().to_string(),
                })
                .collect(),
            packages: package.packages.clone(),
            install_requires: normalized(&config.dependencies.install),
            setup_requires: normalized(&config.dependencies.setup),
            tests_require: normalized(&config.dependencies.tests),
        }
    }

    /// Serialize as JSON
    pub fn to_json(&self, pretty: bool) -> serde_json::Result<String> {
        if pretty {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        }
    }
}

fn normalized(names: &[String]) -> Vec<String> {
    let mut names = names.to_vec();
    names.sort();
    names.dedup();
    names
}
