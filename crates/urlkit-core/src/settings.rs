//! Settings for urlkit.
//!
//! [`Settings`] holds the URL prefixes a generator starts with and the
//! logging configuration. Every prefix is optional: an absent `base_uri`
//! is derived from the request's script path at generation time, and an
//! absent `static_base_uri` falls back to the base URI.

use serde::{Deserialize, Serialize};

/// The complete set of urlkit settings.
///
/// # Examples
///
/// ```
/// use urlkit_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert!(settings.base_uri.is_none());
/// assert_eq!(settings.base_path, "");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    // ── Core ─────────────────────────────────────────────────────────

    /// Whether debug mode is enabled.
    pub debug: bool,

    // ── URL prefixes ─────────────────────────────────────────────────

    /// Prefix for every generated page URL (e.g. `/invo/`).
    pub base_uri: Option<String>,
    /// Prefix for every generated static-asset URL (e.g. `https://cdn.example.com/`).
    pub static_base_uri: Option<String>,
    /// Filesystem prefix for local paths (e.g. `/var/www/htdocs/`).
    pub base_path: String,
    /// Path of the script serving the current request, used to derive a default base URI.
    pub script_path: Option<String>,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            base_uri: None,
            static_base_uri: None,
            base_path: String::new(),
            script_path: None,
            log_level: "info".to_string(),
        }
    }
}
