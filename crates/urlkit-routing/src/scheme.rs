//! Scheme detection and prefix joining.

use std::sync::OnceLock;

use regex::Regex;

/// Returns `true` if `uri` starts with an explicit scheme.
///
/// # Examples
///
/// ```
/// use urlkit_routing::scheme::has_scheme;
///
/// assert!(has_scheme("mailto:someone@example.com"));
/// assert!(has_scheme("https://example.com/"));
/// assert!(!has_scheme("/products/edit/1"));
/// assert!(!has_scheme("/time?at=12:30"));
/// ```
pub fn has_scheme(uri: &str) -> bool {
    static SCHEME_RE: OnceLock<Regex> = OnceLock::new();
    let scheme_re = SCHEME_RE.get_or_init(|| Regex::new(r"^[^:/?#]+:").unwrap());
    scheme_re.is_match(uri)
}

/// Concatenates `prefix` and `fragment` with no separator logic.
pub fn join(prefix: &str, fragment: &str) -> String {
    let mut joined = String::with_capacity(prefix.len() + fragment.len());
    joined.push_str(prefix);
    joined.push_str(fragment);
    joined
}
