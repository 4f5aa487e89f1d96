//! Core error types for urlkit.
//!
//! This module provides the [`UrlError`] enum covering every way URL
//! generation can fail: missing configuration, unknown routes, incomplete
//! route references, and malformed route patterns.

use thiserror::Error;

/// The primary error type for urlkit.
///
/// Every variant is fail-fast: a generation call either returns a complete
/// URL or one of these errors, never a partially built string.
#[derive(Error, Debug)]
pub enum UrlError {
    // ── Configuration ────────────────────────────────────────────────

    /// A collaborator or configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A route pattern could not be compiled or walked.
    #[error("Improperly configured: {0}")]
    ImproperlyConfigured(String),

    // ── Named routes ─────────────────────────────────────────────────

    /// No route is registered under the requested name.
    #[error("Cannot obtain a route using the name \"{0}\"")]
    RouteNotFound(String),

    /// A structured route reference did not name its route.
    #[error("It's necessary to define the route name with the parameter \"for\"")]
    MissingRouteName,

    /// A placeholder in the route pattern has no supplied value.
    #[error("Missing value for parameter '{parameter}' of route \"{route}\"")]
    MissingParameter {
        /// The route being generated.
        route: String,
        /// The placeholder that could not be filled.
        parameter: String,
    },

    // ── IO ───────────────────────────────────────────────────────────

    /// An I/O error occurred.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl UrlError {
    /// Returns the route name carried by this error, if any.
    pub fn route_name(&self) -> Option<&str> {
        match self {
            Self::RouteNotFound(name) | Self::MissingParameter { route: name, .. } => Some(name),
            _ => None,
        }
    }
}

/// A convenience type alias for `Result<T, UrlError>`.
pub type UrlResult<T> = Result<T, UrlError>;
