//! Tracing setup for embedding processes.

/// Install a default env-filtered `tracing` subscriber unless the host has
/// already set one. Controller log lines are emitted under the
/// `doorwarden::log` target.
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(true)
        .try_init();
}
