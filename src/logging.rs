//! Logging setup for the `ui-coverage` binary.
//!
//! Instrumentation narrates through `tracing`; this installs a compact
//! stderr subscriber. `RUST_LOG` applies unless `-v` or `-q` force a level.
//! Coverage summaries and test results are printed to stdout separately.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter directive for the given flags, `None` when `RUST_LOG` should decide.
pub fn filter_directive(verbose: u8, quiet: bool) -> Option<&'static str> {
    match (verbose, quiet) {
        (0, true) => Some("ui_coverage=error"),
        (0, false) => None,
        (1, _) => Some("ui_coverage=debug"),
        _ => Some("ui_coverage=trace"),
    }
}

/// Initialize the global subscriber. Call once, before any logging occurs.
pub fn init_logging(verbose: u8, quiet: bool) {
    let filter = match filter_directive(verbose, quiet) {
        Some(directive) => EnvFilter::new(directive),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ui_coverage=info")),
    };

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact();

    // A subscriber may already be installed (tests, embedding hosts)
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
