//! tracing subscriber setup

use tracing_subscriber::EnvFilter;

/// Initializes logging at `info` unless `RUST_LOG` says otherwise
///
/// `verbose` raises the default level to `debug`.
///
/// Safe to call more than once; later calls are ignored.
pub fn init_with(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
