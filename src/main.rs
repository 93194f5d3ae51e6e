//! Nativepack command-line interface
//!
//! Packaging lifecycle for a Python package with a `CMake`-built native core

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use nativepack::{LifecycleCommand, Toolchain};
use std::path::PathBuf;
use std::process;

/// Display an error with its stage, cause chain and any captured tool output
///
/// Backtraces are only available when `RUST_BACKTRACE` is set; `--backtrace`
/// controls whether a captured one is printed.
fn display_error(err: &anyhow::Error, backtrace_enabled: bool) {
    let failure = err.downcast_ref::<nativepack::Error>();
    match failure {
        Some(failure) => eprintln!("error: [{}] {err}", failure.stage()),
        None => eprintln!("error: {err}"),
    }

    let mut source = err.source();
    while let Some(err) = source {
        eprintln!("caused by: {err}");
        source = err.source();
    }

    if let Some(output) = failure.and_then(nativepack::Error::tool_output) {
        eprintln!("\ntool output:");
        eprintln!("{}", output.trim_end());
    }

    if backtrace_enabled {
        let backtrace = err.backtrace();
        if backtrace.status() == std::backtrace::BacktraceStatus::Captured {
            eprintln!("\nBacktrace:");
            eprintln!("{backtrace}");
        }
    }
}

#[derive(Parser)]
#[command(name = "nativepack")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(
    about = "Package a Python project whose native core is built with CMake",
    long_about = None
)]
pub(crate) struct Cli {
    /// Project root (defaults to the nearest directory with VERSION_NUMBER)
    #[arg(long, global = true)]
    project_root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Show backtraces on error
    #[arg(long, global = true)]
    backtrace: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by the commands that run the native build
#[derive(Args, Debug)]
struct NativeArgs {
    /// Scratch directory for the native build
    #[arg(long)]
    build_temp: Option<PathBuf>,

    /// Package output directory
    #[arg(long)]
    build_lib: Option<PathBuf>,

    /// Stream cmake and make output instead of capturing it
    #[arg(long)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, short, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Write the generated version module
    CreateVersion,

    /// Generate the version module and collect Python sources
    BuildPy {
        /// Package output directory
        #[arg(long)]
        build_lib: Option<PathBuf>,

        /// Suppress all output except errors
        #[arg(long, short)]
        quiet: bool,
    },

    /// Run cmake, make and make install, then copy the package trees
    BuildExt {
        #[command(flatten)]
        native: NativeArgs,
    },

    /// Run build-py followed by build-ext
    Build {
        #[command(flatten)]
        native: NativeArgs,
    },

    /// In-place development install (not supported)
    Develop {
        /// Arguments are accepted and ignored
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// Print the package manifest as JSON
    Manifest {
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Report the resolved toolchain and build configuration
    Check,

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn main() {
    let cli = Cli::parse();

    nativepack::init_debug(cli.debug);
    let backtrace = cli.backtrace;

    if let Err(e) = dispatch(cli) {
        display_error(&e, backtrace);
        process::exit(1);
    }
}

fn dispatch(cli: Cli) -> anyhow::Result<()> {
    if let Commands::Completion { shell } = &cli.command {
        return commands::completion::run(*shell);
    }

    // Preflight: both tools must resolve before any project command runs.
    let toolchain = Toolchain::locate()?;
    let project_root = cli.project_root;

    match cli.command {
        Commands::CreateVersion => commands::lifecycle::run(
            &LifecycleCommand::CreateVersion,
            toolchain,
            commands::lifecycle::LifecycleOptions {
                project_root,
                ..Default::default()
            },
        ),
        Commands::BuildPy { build_lib, quiet } => commands::lifecycle::run(
            &LifecycleCommand::BuildPy,
            toolchain,
            commands::lifecycle::LifecycleOptions {
                project_root,
                build_lib,
                quiet,
                ..Default::default()
            },
        ),
        Commands::BuildExt { native } => commands::lifecycle::run(
            &LifecycleCommand::BuildExt,
            toolchain,
            native.into_options(project_root),
        ),
        Commands::Build { native } => commands::lifecycle::run(
            &LifecycleCommand::Build,
            toolchain,
            native.into_options(project_root),
        ),
        Commands::Develop { args } => commands::lifecycle::run(
            &LifecycleCommand::Develop { args },
            toolchain,
            commands::lifecycle::LifecycleOptions {
                project_root,
                ..Default::default()
            },
        ),
        Commands::Manifest { pretty } => commands::manifest::run(project_root, pretty),
        Commands::Check => commands::check::run(&toolchain, project_root),
        Commands::Completion { shell } => commands::completion::run(shell),
    }
}

impl NativeArgs {
    fn into_options(self, project_root: Option<PathBuf>) -> commands::lifecycle::LifecycleOptions {
        commands::lifecycle::LifecycleOptions {
            project_root,
            build_temp: self.build_temp,
            build_lib: self.build_lib,
            verbose: self.verbose,
            quiet: self.quiet,
        }
    }
}

mod commands;
