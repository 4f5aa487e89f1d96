//! Logging integration for urlkit.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and a span for grouping the log
//! entries of one URL generation call.

use crate::settings::Settings;

/// Installs the global tracing subscriber described by `settings`.
///
/// `RUST_LOG` takes precedence over `settings.log_level`; an unparsable
/// directive falls back to `info`. Debug mode logs in a pretty, multi-line
/// format with source locations, otherwise each event is one JSON object
/// carrying the current span (e.g. the route being generated).
///
/// Only the first call installs a subscriber; later calls are no-ops.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&settings.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter).with_target(true);

    let installed = if settings.debug {
        builder
            .pretty()
            .with_file(true)
            .with_line_number(true)
            .try_init()
    } else {
        builder.json().with_current_span(true).try_init()
    };
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}

/// Creates a tracing span for generating the URL of a named route.
///
/// # Examples
///
/// ```
/// use urlkit_core::logging::route_span;
///
/// let span = route_span("blog-post");
/// let _guard = span.enter();
/// tracing::debug!("generating url");
/// ```
pub fn route_span(route_name: &str) -> tracing::Span {
    tracing::debug_span!("url_for", route = route_name)
}
