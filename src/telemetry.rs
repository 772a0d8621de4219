//! Tracing subscriber initialisation.

use tracing_subscriber::EnvFilter;

/// Directive applied when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "civic_resolve=info,tower_http=info";

/// Installs the global `fmt` subscriber filtered by `RUST_LOG`.
///
/// Returns `false` when a global subscriber was already installed.
#[must_use]
pub fn init_tracing() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
