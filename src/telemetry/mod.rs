//! Tracing setup for the pipeline's structured logging.
//!
//! Log verbosity follows `RUST_LOG` when set, falling back to the `LOG_LEVEL`
//! convention of the hosting app (`debug|info|warn|error`), then to `info`.

use tracing_subscriber::EnvFilter;

/// Install a global `tracing` subscriber. Safe to call more than once; later
/// calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| {
            std::env::var("LOG_LEVEL").map(|level| EnvFilter::new(level))
        })
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
