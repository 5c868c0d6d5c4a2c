// src/infra/logger.rs — Structured logging with tracing

use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber. `RUST_LOG` wins over `level` when set.
///
/// Output goes to stderr so the full-screen dashboard and piped answers on
/// stdout stay clean.
pub fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();
}
