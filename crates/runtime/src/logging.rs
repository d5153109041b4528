//! Tracing subscriber bootstrap for binaries.

/// Installs a stderr `fmt` subscriber filtered by `RUST_LOG`, at `info` unless
/// overridden. Calling it again is a no-op.
pub fn init() {
    let filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing::Level::INFO.into());

    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok();

    if installed {
        tracing::debug!("logging initialized");
    }
}
