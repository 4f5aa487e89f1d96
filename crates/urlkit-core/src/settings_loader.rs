//! Loading [`Settings`] from configuration files and the environment.
//!
//! Settings are resolved in three layers, later layers winning:
//!
//! 1. [`Settings::default`].
//! 2. A TOML or JSON document. Only the keys it names are overridden and
//!    unknown keys are ignored.
//! 3. `URLKIT_*` environment variables, via [`apply_env_overrides`].
//!
//! | Env Var | Setting |
//! |---|---|
//! | `URLKIT_DEBUG` | `debug` |
//! | `URLKIT_LOG_LEVEL` | `log_level` |
//! | `URLKIT_BASE_URI` | `base_uri` |
//! | `URLKIT_STATIC_BASE_URI` | `static_base_uri` |
//! | `URLKIT_BASE_PATH` | `base_path` |
//! | `URLKIT_SCRIPT_PATH` | `script_path` |
//!
//! ```rust,no_run
//! use urlkit_core::settings_loader;
//!
//! // The format follows the file extension.
//! let settings = settings_loader::from_file_with_env("config/urls.toml").unwrap();
//! ```

use std::path::Path;

use serde_json::Value;

use crate::error::{UrlError, UrlResult};
use crate::settings::Settings;

const ENV_PREFIX: &str = "URLKIT_";

/// A configuration file syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Toml,
    Json,
}

impl ConfigFormat {
    /// Picks the format from a `.toml` or `.json` extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?;
        if extension.eq_ignore_ascii_case("toml") {
            Some(Self::Toml)
        } else if extension.eq_ignore_ascii_case("json") {
            Some(Self::Json)
        } else {
            None
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Toml => "TOML",
            Self::Json => "JSON",
        }
    }

    /// Parses `source` into a JSON document so both formats share one merge path.
    fn parse(self, source: &str) -> UrlResult<Value> {
        let parsed = match self {
            Self::Toml => toml::from_str::<Value>(source).map_err(|e| e.to_string()),
            Self::Json => serde_json::from_str::<Value>(source).map_err(|e| e.to_string()),
        };
        parsed.map_err(|e| {
            UrlError::Configuration(format!("Failed to parse {}: {e}", self.name()))
        })
    }
}

/// Loads settings from `source` written in `format`.
///
/// Keys missing from `source` keep their default values.
pub fn parse_settings(source: &str, format: ConfigFormat) -> UrlResult<Settings> {
    let mut merged = serde_json::to_value(Settings::default()).map_err(|e| {
        UrlError::Configuration(format!("Failed to serialize default settings: {e}"))
    })?;
    merge_json(&mut merged, format.parse(source)?);

    serde_json::from_value(merged).map_err(|e| {
        UrlError::Configuration(format!("Invalid {} settings: {e}", format.name()))
    })
}

/// Loads settings from a TOML string.
pub fn from_toml_str(source: &str) -> UrlResult<Settings> {
    parse_settings(source, ConfigFormat::Toml)
}

/// Loads settings from a JSON string.
pub fn from_json_str(source: &str) -> UrlResult<Settings> {
    parse_settings(source, ConfigFormat::Json)
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> UrlResult<Settings> {
    load(path.as_ref(), ConfigFormat::Toml)
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> UrlResult<Settings> {
    load(path.as_ref(), ConfigFormat::Json)
}

/// Loads settings from a file whose format is given by its extension.
///
/// # Errors
///
/// Returns [`UrlError::Io`] if the file cannot be read, and
/// [`UrlError::Configuration`] if the extension is neither `.toml` nor
/// `.json` or the contents do not parse.
pub fn from_file(path: impl AsRef<Path>) -> UrlResult<Settings> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path).ok_or_else(|| {
        UrlError::Configuration(format!(
            "Cannot tell the settings format of '{}'; expected a .toml or .json file",
            path.display()
        ))
    })?;
    load(path, format)
}

/// Like [`from_file`], then applies [`apply_env_overrides`].
pub fn from_file_with_env(path: impl AsRef<Path>) -> UrlResult<Settings> {
    let mut settings = from_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Builds settings from the defaults and the environment alone.
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Overrides `settings` with every `URLKIT_*` variable that is set.
///
/// `URLKIT_DEBUG` is true for `1`, `true`, `yes` or `on` (any case) and
/// false for anything else.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Some(debug) = env_var("DEBUG") {
        settings.debug = parse_flag(&debug);
    }
    if let Some(log_level) = env_var("LOG_LEVEL") {
        settings.log_level = log_level;
    }
    if let Some(base_path) = env_var("BASE_PATH") {
        settings.base_path = base_path;
    }

    let prefixes = [
        ("BASE_URI", &mut settings.base_uri),
        ("STATIC_BASE_URI", &mut settings.static_base_uri),
        ("SCRIPT_PATH", &mut settings.script_path),
    ];
    for (name, slot) in prefixes {
        if let Some(value) = env_var(name) {
            *slot = Some(value);
        }
    }
}

// ============================================================
// Helpers
// ============================================================

fn load(path: &Path, format: ConfigFormat) -> UrlResult<Settings> {
    let source = std::fs::read_to_string(path)?;
    parse_settings(&source, format)
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{name}")).ok()
}

fn parse_flag(value: &str) -> bool {
    ["1", "true", "yes", "on"]
        .iter()
        .any(|flag| value.trim().eq_ignore_ascii_case(flag))
}

/// Merges `overrides` into `base`; objects merge per key, anything else replaces.
fn merge_json(base: &mut Value, overrides: Value) {
    match (base, overrides) {
        (Value::Object(base_map), Value::Object(override_map)) => {
            for (key, value) in override_map {
                match base_map.get_mut(&key) {
                    Some(slot) => merge_json(slot, value),
                    None => {
                        base_map.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    // ── TOML ────────────────────────────────────────────────────────

    #[test]
    fn test_toml_prefixes_keep_other_defaults() {
        let settings = from_toml_str(
            r#"
            base_uri = "/invo/"
            static_base_uri = "https://cdn.example.com/"
            debug = false
            "#,
        )
        .unwrap();
        assert_eq!(settings.base_uri.as_deref(), Some("/invo/"));
        assert_eq!(
            settings.static_base_uri.as_deref(),
            Some("https://cdn.example.com/")
        );
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "info");
        assert!(settings.base_path.is_empty());
    }

    #[test]
    fn test_toml_empty_document_is_defaults() {
        let settings = from_toml_str("").unwrap();
        assert!(settings.debug);
        assert!(settings.base_uri.is_none());
    }

    #[test]
    fn test_toml_syntax_error() {
        let err = from_toml_str("[[unterminated").unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML"));
    }

    #[test]
    fn test_toml_unknown_keys_ignored() {
        let settings = from_toml_str("base_uri = \"/a/\"\n[cdn]\nregion = \"eu-west\"").unwrap();
        assert_eq!(settings.base_uri.as_deref(), Some("/a/"));
    }

    #[test]
    fn test_toml_wrong_type() {
        let err = from_toml_str("debug = \"sometimes\"").unwrap_err();
        assert!(matches!(err, UrlError::Configuration(_)));
        assert!(err.to_string().contains("Invalid TOML settings"));
    }

    // ── JSON ────────────────────────────────────────────────────────

    #[test]
    fn test_json_paths() {
        let settings = from_json_str(
            r#"{"base_path": "/var/www/htdocs/", "script_path": "/invo/public/index.php", "log_level": "debug"}"#,
        )
        .unwrap();
        assert_eq!(settings.base_path, "/var/www/htdocs/");
        assert_eq!(settings.script_path.as_deref(), Some("/invo/public/index.php"));
        assert_eq!(settings.log_level, "debug");
        assert!(settings.base_uri.is_none());
    }

    #[test]
    fn test_json_syntax_error() {
        assert!(from_json_str("{not json").is_err());
    }

    // ── Files ───────────────────────────────────────────────────────

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("urls.toml")), Some(ConfigFormat::Toml));
        assert_eq!(ConfigFormat::from_path(Path::new("URLS.JSON")), Some(ConfigFormat::Json));
        assert_eq!(ConfigFormat::from_path(Path::new("urls.yaml")), None);
        assert_eq!(ConfigFormat::from_path(Path::new("urls")), None);
    }

    #[test]
    fn test_missing_file() {
        let err = from_toml_file("/nonexistent/urlkit/settings.toml").unwrap_err();
        assert!(matches!(err, UrlError::Io(_)));

        let err = from_file("/nonexistent/urlkit/settings.json").unwrap_err();
        assert!(matches!(&err, UrlError::Io(e) if e.kind() == std::io::ErrorKind::NotFound));
    }

    #[test]
    fn test_unknown_extension() {
        let err = from_file("/etc/urlkit/settings.ini").unwrap_err();
        assert!(err.to_string().contains(".toml or .json"));
    }

    #[test]
    fn test_from_file_detects_json() {
        let path = std::env::temp_dir().join("urlkit_settings_loader_test.json");
        std::fs::write(&path, r#"{"base_uri": "/shop/"}"#).unwrap();
        let settings = from_file(&path).unwrap();
        assert_eq!(settings.base_uri.as_deref(), Some("/shop/"));
        assert_eq!(from_json_file(&path).unwrap().base_uri, settings.base_uri);
        std::fs::remove_file(&path).ok();
    }

    // ── Environment ─────────────────────────────────────────────────

    #[test]
    fn test_env_overrides_base_uri() {
        let mut settings = Settings::default();
        std::env::set_var("URLKIT_BASE_URI", "/env-base/");
        apply_env_overrides(&mut settings);
        std::env::remove_var("URLKIT_BASE_URI");
        assert_eq!(settings.base_uri.as_deref(), Some("/env-base/"));
    }

    #[test]
    fn test_env_overrides_static_base_uri() {
        let mut settings = Settings::default();
        std::env::set_var("URLKIT_STATIC_BASE_URI", "https://static.example.com/");
        apply_env_overrides(&mut settings);
        std::env::remove_var("URLKIT_STATIC_BASE_URI");
        assert_eq!(
            settings.static_base_uri.as_deref(),
            Some("https://static.example.com/")
        );
    }

    #[test]
    fn test_parse_flag() {
        for on in ["1", "true", "TRUE", "yes", " on "] {
            assert!(parse_flag(on), "{on}");
        }
        for off in ["0", "false", "no", "", "enabled"] {
            assert!(!parse_flag(off), "{off}");
        }
    }

    // ── Merging ─────────────────────────────────────────────────────

    #[test]
    fn test_merge_json_nested() {
        let mut base = json!({"a": {"b": 1, "c": 2}, "d": 3});
        merge_json(&mut base, json!({"a": {"c": 20}, "e": null}));
        assert_eq!(base, json!({"a": {"b": 1, "c": 20}, "d": 3, "e": null}));
    }

    #[test]
    fn test_merge_json_scalar_replaces_object() {
        let mut base = json!({"a": {"b": 1}});
        merge_json(&mut base, json!({"a": 5}));
        assert_eq!(base, json!({"a": 5}));
    }
}
