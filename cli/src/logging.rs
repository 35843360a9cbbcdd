//! Diagnostics for the `rsvp` binary.
//!
//! The core emits `submit_entry` spans carrying a per-submission id and the
//! add encoding, `debug` events for each request sent to the store, and
//! `info`/`warn` events for saved entries, admin logins, list counts and
//! store replies that had to be read as empty. The host adds the export path. All of it goes to
//! stderr so stdout carries only command output (tables, JSON, file paths).

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::LoggingConfig;

/// Installs the global subscriber. `RUST_LOG` takes precedence over
/// `logging.level`, which `-v` flags raise.
pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let registry = tracing_subscriber::registry().with(filter);

    if config.format == "json" {
        registry
            .with(fmt::layer().json().with_current_span(true).with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(fmt::layer().pretty().without_time().with_writer(std::io::stderr))
            .init();
    }
}
