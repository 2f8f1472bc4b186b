//! Tracing initialization for binaries and tests embedding the crate.

use tracing_subscriber::EnvFilter;

/// Installs the global tracing subscriber and the `log` bridge. Safe to
/// call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .is_ok()
    {
        return;
    }

    // A subscriber is already installed; still bridge `log` records into
    // tracing if nothing claimed the logger yet.
    let _ = tracing_log::LogTracer::init();
}
