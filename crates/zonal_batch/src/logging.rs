//! Tracing subscriber setup for the command-line tools.

use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber filtered by `RUST_LOG`, defaulting to `info`.
///
/// Returns false when a global subscriber is already set.
pub fn init_tracing() -> bool {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
