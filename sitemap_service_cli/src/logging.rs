//! Logging init shared by the CLI and the server: `fmt` subscriber on stderr.

use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info,sitemap_service_cli=debug,server=debug";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
/// Calling it again (e.g. from several tests) is a no-op.
pub fn init_logging() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .try_init();
}
