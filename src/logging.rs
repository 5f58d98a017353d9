//! Tracing setup shared by the server and the import binaries.

use tracing_subscriber::EnvFilter;

/// Install a stderr subscriber.
///
/// `RUST_LOG` wins when set; otherwise `fallback` (usually `LOG_LEVEL`) is
/// used as the filter. Stdout is left alone for the MCP transport.
pub fn init(fallback: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(fallback))
        .unwrap_or_else(|_| EnvFilter::new("error"));

    // A second init (tests, repeated calls) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// `LOG_LEVEL` from the environment (after `.env`), or `error`.
pub fn level_from_env() -> String {
    let _ = dotenvy::dotenv();
    std::env::var("LOG_LEVEL").unwrap_or_else(|_| "error".to_string())
}
