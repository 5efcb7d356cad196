//! Tracing setup for the `watchpack` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is the
//! application's job.

use tracing_subscriber::EnvFilter;

/// Default filter when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "warn";

/// Installs a fmt subscriber writing to stderr, filtered by `RUST_LOG`.
///
/// `verbose` raises the default to `debug` for this crate. Calling it again
/// is a no-op.
pub fn init_tracing_subscriber(verbose: bool) {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new(format!("{DEFAULT_FILTER},watchpack=debug"))
        } else {
            EnvFilter::new(DEFAULT_FILTER)
        }
    });

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
