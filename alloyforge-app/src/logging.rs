use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global subscriber.
///
/// `RUST_LOG` selects the filter (default `info`). Diagnostics go to stderr
/// so the reports printed on stdout stay clean.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .init();
}
