//! Logging setup for the generator binary
//!
//! Configure via the RUST_LOG environment variable:
//! - `RUST_LOG=debug` - per-file scan and load progress
//! - `RUST_LOG=snippet_registry::loader=debug` - module-level filtering
//!
//! Defaults to `info`, which shows the run summary and every warning.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Initialize the console subscriber on stderr. Call once, from `main`.
pub fn init() {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_filter(console_filter);

    tracing_subscriber::registry().with(console_layer).init();
}
