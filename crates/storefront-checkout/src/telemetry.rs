//! Structured logging setup.

use tracing_subscriber::EnvFilter;

/// Builds the filter: `RUST_LOG` when set, otherwise `fallback`.
pub fn env_filter(fallback: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback))
}

/// Initializes the tracing subscriber for structured logging.
///
/// `filter` is usually `CheckoutConfig::logging.filter`.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show every pipeline step
/// - `RUST_LOG=storefront_checkout=trace` - Trace a single crate
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter(filter))
        .try_init();
}
