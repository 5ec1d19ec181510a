//! `tracing` subscriber setup for binaries embedding the store.

use tracing_subscriber::EnvFilter;

/// Install a formatting subscriber filtered at `level`.
///
/// `RUST_LOG`, when set and valid, takes precedence over `level`. An invalid
/// `level` falls back to `info`. Returns `false` if a global subscriber was
/// already installed, in which case nothing changes, so calling this more
/// than once is harmless.
pub fn init(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
