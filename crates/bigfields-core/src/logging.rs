//! Logging integration.
//!
//! Provides helpers for configuring [`tracing`]-based logging from
//! [`Settings`](crate::settings::Settings) and for scoping schema resolution
//! events to the model being resolved.

use crate::settings::Settings;

/// Sets up the global tracing subscriber based on the given settings.
///
/// The filter is read from `settings.log_level`. In debug mode a pretty,
/// human-readable format is used; otherwise structured JSON. Installing a
/// second subscriber is a no-op.
pub fn setup_logging(settings: &Settings) {
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_new(&settings.log_level).unwrap_or_else(|_| EnvFilter::new("info"));

    if settings.debug {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .with_file(true)
            .with_line_number(true)
            .pretty()
            .try_init()
            .ok();
    } else {
        fmt::Subscriber::builder()
            .with_env_filter(filter)
            .with_target(true)
            .json()
            .try_init()
            .ok();
    }
}

/// Creates a tracing span covering the column type resolution of one model.
///
/// # Examples
///
/// ```
/// use bigfields_core::logging::schema_span;
///
/// let span = schema_span("oauth2.token");
/// let _guard = span.enter();
/// tracing::debug!("resolving columns");
/// ```
pub fn schema_span(model: &str) -> tracing::Span {
    tracing::info_span!("schema", model = model)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_logging_twice_is_harmless() {
        let mut settings = Settings::default();
        settings.log_level = "not a [valid filter".to_string();
        setup_logging(&settings);
        settings.debug = false;
        setup_logging(&settings);
    }

    #[test]
    fn test_schema_span_enters() {
        let span = schema_span("oauth2.client");
        let _guard = span.enter();
        tracing::debug!("inside schema span");
    }
}
