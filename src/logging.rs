//! Logging init for the binary: structured events to stderr.
//!
//! The library only emits `tracing` events; nothing is printed unless a
//! subscriber is installed. `RUST_LOG` wins over the built-in filter.

use tracing_subscriber::EnvFilter;

fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "warn,assist_media=debug"
    } else {
        "warn,assist_media=info"
    }
}

/// Install a stderr subscriber. Safe to call more than once; later calls
/// are ignored.
pub fn init_logging(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(verbose)));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
