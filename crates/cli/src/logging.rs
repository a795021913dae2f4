use danglr_core::ScanOptions;
use tracing::warn;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Install the global subscriber: fmt on stderr plus journald when enabled.
///
/// `RUST_LOG` overrides `console_level` for the stderr layer only.
pub fn init_logging(options: &ScanOptions, console_level: &str) {
    let console_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(console_level));

    let (journald, journald_error) = if options.syslog_logging {
        match tracing_journald::layer() {
            Ok(layer) => (
                Some(
                    layer
                        .with_syslog_identifier(options.syslog_ident.clone())
                        .with_filter(LevelFilter::INFO),
                ),
                None,
            ),
            Err(e) => (None, Some(e)),
        }
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_filter(console_filter),
        )
        .with(journald)
        .init();

    if let Some(e) = journald_error {
        warn!("Syslog unavailable, logging to stderr only: {}", e);
    }
}
