//! Check command
//!
//! Report the resolved toolchain, project and native build configuration

use anyhow::{Result, bail};
use nativepack::{BuildInputs, CONFIG_FILE, Project, Toolchain, VersionResolver};
use std::path::PathBuf;

/// Print everything a build would use and fail if a build could not start
pub(crate) fn run(toolchain: &Toolchain, project_root: Option<PathBuf>) -> Result<()> {
    let project = Project::discover(project_root, None, None)?;
    let mut problems = Vec::new();

    println!("Toolchain");
    println!("  generator: {}", toolchain.generator.display());
    println!("  driver:    {}", toolchain.driver.display());

    println!("Project");
    println!("  root:      {}", project.root.display());
    let config_path = project.root.join(CONFIG_FILE);
    if config_path.is_file() {
        println!("  config:    {}", config_path.display());
    } else {
        println!("  config:    (defaults)");
    }
    match VersionResolver::new(&project.root).resolve() {
        Ok(version) => println!("  version:   {version}"),
        Err(e) => {
            println!("  version:   unavailable");
            problems.push(e.to_string());
        }
    }
    let units: Vec<_> = project
        .config
        .extensions
        .iter()
        .map(|unit| unit.name.as_str())
        .collect();
    println!("  extension: {}", units.join(", "));
    if units.len() != 1 {
        problems.push(format!(
            "exactly one extension unit is required, found {}",
            units.len()
        ));
    }

    println!("Native build");
    println!("  build_temp: {}", project.build_temp.display());
    println!("  build_lib:  {}", project.build_lib.display());
    match BuildInputs::from_environment().resolve(&project.build_temp) {
        Ok(config) => {
            println!("  build dir:   {}", config.build_dir.display());
            println!("  install dir: {}", config.install_dir.display());
            println!("  interpreter: {}", config.interpreter_path.display());
            println!("  include dir: {}", config.include_dir.display());
            println!("  jobs:        {}", config.parallelism);
            println!("  CMAKE_ARGS:  {:?}", config.extra_args);
        }
        Err(e) => problems.push(e.to_string()),
    }

    if problems.is_empty() {
        println!("\nReady to build");
        return Ok(());
    }

    println!();
    for problem in &problems {
        println!("  problem: {problem}");
    }
    bail!("{} problem(s) found", problems.len())
}
