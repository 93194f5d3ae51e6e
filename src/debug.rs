//! Debug logging setup
//!
//! Installs a `tracing` subscriber on stderr. `--debug` turns on debug
//! events for this crate; `RUST_LOG` overrides the filter entirely.

use tracing_subscriber::EnvFilter;

/// Filter directive used when `RUST_LOG` is unset
fn default_directive(enabled: bool) -> &'static str {
    if enabled {
        "nativepack=debug"
    } else {
        "nativepack=warn"
    }
}

/// Initialize logging from the command-line flag
pub fn init_debug(enabled: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(enabled)));

    // A subscriber may already be installed (tests, embedding); keep it.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .with_target(false)
        .try_init()
        .ok();
}
