use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. `log` records are bridged into it, so
/// `log::info!` and tower-http's request spans end up in the same output.
/// Verbosity follows `RUST_LOG`, defaulting to `info`.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if tracing_subscriber::fmt().with_env_filter(filter).try_init().is_err() {
        log::debug!("logging already initialised");
    }
}
