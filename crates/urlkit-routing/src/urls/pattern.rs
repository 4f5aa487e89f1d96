//! Route patterns, reversed-path templates, and compiled routes.
//!
//! A route pattern mixes literal text with placeholders:
//!
//! - `{name}` and `{name:regex}`: named placeholders
//! - `(regex)`: anonymous capture groups
//! - `:controller`, `:action`, ...: [shorthand](super::converters) placeholders
//!
//! Compiling a pattern produces an anchored [`Regex`] and a
//! [`ReversedPaths`] template recording which placeholder name sits at
//! which capture position. A pattern starting with `#` is taken as a raw
//! regex between `#` delimiters and compiled as-is.

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use urlkit_core::{UrlError, UrlResult};

use super::converters::Shorthand;
use crate::target::RouteRef;

/// Maps capture positions (1-based) to placeholder names.
///
/// # Examples
///
/// ```
/// use urlkit_routing::urls::pattern::ReversedPaths;
///
/// let paths = ReversedPaths::from_names([("year", 1), ("title", 2)]);
/// assert_eq!(paths.name_at(1), Some("year"));
/// assert_eq!(paths.position_of("title"), Some(2));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReversedPaths {
    positions: BTreeMap<usize, String>,
}

impl ReversedPaths {
    /// Creates an empty template.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a template from `name -> position` pairs.
    pub fn from_names<I, N>(paths: I) -> Self
    where
        I: IntoIterator<Item = (N, usize)>,
        N: Into<String>,
    {
        paths
            .into_iter()
            .map(|(name, position)| (position, name.into()))
            .collect()
    }

    /// Records `name` at `position`, replacing any earlier name there.
    pub fn insert(&mut self, position: usize, name: impl Into<String>) {
        self.positions.insert(position, name.into());
    }

    /// Returns the placeholder name at `position`.
    pub fn name_at(&self, position: usize) -> Option<&str> {
        self.positions.get(&position).map(String::as_str)
    }

    /// Returns the position of the placeholder called `name`.
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.positions
            .iter()
            .find_map(|(position, n)| (n == name).then_some(*position))
    }

    /// Iterates over `(position, name)` pairs in position order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.positions.iter().map(|(p, n)| (*p, n.as_str()))
    }

    /// Returns the number of recorded positions.
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Returns `true` if no position carries a name.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

impl FromIterator<(usize, String)> for ReversedPaths {
    fn from_iter<T: IntoIterator<Item = (usize, String)>>(iter: T) -> Self {
        Self {
            positions: iter.into_iter().collect(),
        }
    }
}

/// A custom URL builder: `(base_uri, reversed_paths, route_ref) -> url`.
pub type UrlBuilderFn = Arc<dyn Fn(&str, &ReversedPaths, &RouteRef) -> String + Send + Sync>;

/// How a route turns a [`RouteRef`] into a URL.
#[derive(Clone, Default)]
pub enum UrlBuilder {
    /// Substitute the parameters into the route pattern.
    #[default]
    Default,
    /// Hand the whole generation to a caller-supplied function.
    Custom(UrlBuilderFn),
}

impl UrlBuilder {
    /// Returns `true` for a [`UrlBuilder::Custom`] builder.
    pub const fn is_custom(&self) -> bool {
        matches!(self, Self::Custom(_))
    }
}

impl fmt::Debug for UrlBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Default => f.write_str("Default"),
            Self::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A named route: source pattern, compiled regex, and generation metadata.
#[derive(Debug, Clone)]
pub struct Route {
    name: String,
    pattern: String,
    compiled: Regex,
    reversed_paths: ReversedPaths,
    hostname: Option<String>,
    url_builder: UrlBuilder,
}

impl Route {
    /// Compiles `pattern` into a route called `name`.
    ///
    /// # Examples
    ///
    /// ```
    /// use urlkit_routing::urls::pattern::Route;
    ///
    /// let route = Route::new("blog-post", "/blog/{year:[0-9]{4}}/{title}").unwrap();
    /// assert_eq!(route.reversed_paths().name_at(1), Some("year"));
    /// assert!(route.compiled_pattern().is_match("/blog/2012/some-cool-stuff"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`UrlError::ImproperlyConfigured`] if the pattern has an
    /// unclosed placeholder, an invalid placeholder name, or an invalid regex.
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> UrlResult<Self> {
        let pattern = pattern.into();
        let (compiled, reversed_paths) = compile_pattern(&pattern)?;
        Ok(Self {
            name: name.into(),
            pattern,
            compiled,
            reversed_paths,
            hostname: None,
            url_builder: UrlBuilder::Default,
        })
    }

    /// Names anonymous capture positions (`name -> position`).
    #[must_use]
    pub fn with_paths<I, N>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = (N, usize)>,
        N: Into<String>,
    {
        for (name, position) in paths {
            self.reversed_paths.insert(position, name);
        }
        self
    }

    /// Sets the hostname template prepended to hostname-qualified URLs.
    #[must_use]
    pub fn with_hostname(mut self, hostname: impl Into<String>) -> Self {
        self.hostname = Some(hostname.into());
        self
    }

    /// Replaces pattern substitution with a custom builder.
    #[must_use]
    pub fn with_url_builder<F>(mut self, builder: F) -> Self
    where
        F: Fn(&str, &ReversedPaths, &RouteRef) -> String + Send + Sync + 'static,
    {
        self.url_builder = UrlBuilder::Custom(Arc::new(builder));
        self
    }

    /// Returns the route name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the source pattern, placeholders included.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Returns the anchored regex the pattern compiles to.
    pub const fn compiled_pattern(&self) -> &Regex {
        &self.compiled
    }

    /// Returns the position-to-name template used for reversal.
    pub const fn reversed_paths(&self) -> &ReversedPaths {
        &self.reversed_paths
    }

    /// Returns the hostname prepended when a reference asks for it.
    pub fn hostname(&self) -> Option<&str> {
        self.hostname.as_deref()
    }

    /// Returns the builder that turns a reference into a path.
    pub const fn url_builder(&self) -> &UrlBuilder {
        &self.url_builder
    }
}

// ============================================================
// Tokenizer
// ============================================================

/// One piece of a route pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// Plain text.
    Literal(&'a str),
    /// Regex text that is not a placeholder, e.g. `(?:a|b)`.
    Verbatim(&'a str),
    /// `{name}` or `{name:regex}`.
    Named { name: &'a str, regex: Option<&'a str> },
    /// `(regex)`, the inner regex.
    Group(&'a str),
    /// `/:controller`, `/:int`, ...
    Shorthand(Shorthand),
}

impl<'a> Token<'a> {
    /// Returns `true` if this token takes a value when the route is reversed.
    pub(crate) const fn is_placeholder(&self) -> bool {
        matches!(self, Self::Named { .. } | Self::Group(_) | Self::Shorthand(_))
    }

    /// Returns the regex this token compiles to.
    fn to_regex(self) -> Cow<'a, str> {
        match self {
            Self::Literal(text) => Cow::Owned(regex::escape(text)),
            Self::Verbatim(text) => Cow::Borrowed(text),
            Self::Named { regex, .. } => Cow::Owned(format!("({})", regex.unwrap_or("[^/]*"))),
            Self::Group(inner) => Cow::Owned(format!("({inner})")),
            Self::Shorthand(shorthand) => Cow::Borrowed(shorthand.regex()),
        }
    }

    /// Returns how many capture groups the compiled token opens.
    fn capture_groups(self) -> usize {
        match self {
            Self::Literal(_) => 0,
            Self::Verbatim(text) => count_capture_groups(text),
            Self::Named { regex, .. } => 1 + regex.map_or(0, count_capture_groups),
            Self::Group(inner) => 1 + count_capture_groups(inner),
            Self::Shorthand(shorthand) => count_capture_groups(shorthand.regex()),
        }
    }
}

/// A token and, for placeholders, the capture position of its outer group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Placed<'a> {
    pub(crate) token: Token<'a>,
    pub(crate) position: Option<usize>,
}

/// Tokenizes `pattern` and numbers its placeholders by capture position.
///
/// Groups nested inside a placeholder's regex take positions too, so the
/// numbering matches the compiled regex.
pub(crate) fn place(pattern: &str) -> UrlResult<Vec<Placed<'_>>> {
    let mut next = 1;
    let placed = tokenize(pattern)?
        .into_iter()
        .map(|token| {
            let position = token.is_placeholder().then_some(next);
            next += token.capture_groups();
            Placed { token, position }
        })
        .collect();
    Ok(placed)
}

/// Splits a route pattern into literal text and placeholders.
///
/// Shorthands are only recognized right after a `/`; `:params` takes that
/// slash into its own group. Anywhere else `:word` is literal text.
pub(crate) fn tokenize(pattern: &str) -> UrlResult<Vec<Token<'_>>> {
    let bytes = pattern.as_bytes();
    let mut tokens = Vec::new();
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'{' => {
                push_literal(&mut tokens, &pattern[literal_start..i]);
                let end = matching_close(pattern, i, b'{', b'}')?;
                let inner = &pattern[i + 1..end];
                let (name, regex) = inner
                    .split_once(':')
                    .map_or((inner, None), |(n, r)| (n, Some(r)));
                if !is_valid_name(name) {
                    return Err(UrlError::ImproperlyConfigured(format!(
                        "Invalid placeholder '{{{inner}}}' in route pattern: {pattern}"
                    )));
                }
                tokens.push(Token::Named { name, regex });
                i = end + 1;
                literal_start = i;
            }
            b'(' => {
                push_literal(&mut tokens, &pattern[literal_start..i]);
                let end = matching_close(pattern, i, b'(', b')')?;
                let inner = &pattern[i + 1..end];
                if inner.starts_with('?') {
                    tokens.push(Token::Verbatim(&pattern[i..=end]));
                } else {
                    tokens.push(Token::Group(inner));
                }
                i = end + 1;
                literal_start = i;
            }
            b':' if i > 0 && bytes[i - 1] == b'/' => {
                let word_len = bytes[i + 1..]
                    .iter()
                    .take_while(|b| b.is_ascii_lowercase())
                    .count();
                let word_end = i + 1 + word_len;
                if let Some(shorthand) = Shorthand::from_name(&pattern[i + 1..word_end]) {
                    let literal_end = if shorthand.is_optional() { i - 1 } else { i };
                    push_literal(&mut tokens, &pattern[literal_start..literal_end]);
                    tokens.push(Token::Shorthand(shorthand));
                    literal_start = word_end;
                }
                i = word_end;
            }
            _ => i += 1,
        }
    }

    push_literal(&mut tokens, &pattern[literal_start..]);
    Ok(tokens)
}

fn push_literal<'a>(tokens: &mut Vec<Token<'a>>, text: &'a str) {
    if !text.is_empty() {
        tokens.push(Token::Literal(text));
    }
}

/// Returns the index of the delimiter closing the one at `open_at`.
fn matching_close(pattern: &str, open_at: usize, open: u8, close: u8) -> UrlResult<usize> {
    let bytes = pattern.as_bytes();
    let mut depth = 0usize;
    let mut i = open_at;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\\' {
            i += 2;
            continue;
        }
        if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Ok(i);
            }
        }
        i += 1;
    }

    Err(UrlError::ImproperlyConfigured(format!(
        "Unclosed '{}' in route pattern: {pattern}",
        char::from(open)
    )))
}

fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
}

/// Counts the capturing groups a regex opens: plain `(...)` and named
/// `(?P<name>...)` / `(?<name>...)`, skipping escapes and character classes.
fn count_capture_groups(regex: &str) -> usize {
    let bytes = regex.as_bytes();
    let mut count = 0;
    let mut in_class = false;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 1,
            b'[' if !in_class => in_class = true,
            b']' if in_class => in_class = false,
            b'(' if !in_class => {
                let rest = &regex[i + 1..];
                if !rest.starts_with('?') || rest.starts_with("?P<") || rest.starts_with("?<") {
                    count += 1;
                }
            }
            _ => {}
        }
        i += 1;
    }
    count
}

// ============================================================
// Compilation
// ============================================================

/// Compiles a route pattern into an anchored regex and its reversed-path template.
fn compile_pattern(pattern: &str) -> UrlResult<(Regex, ReversedPaths)> {
    if let Some(raw) = raw_regex(pattern) {
        let compiled = Regex::new(raw).map_err(|e| {
            UrlError::ImproperlyConfigured(format!("Invalid route regex '{pattern}': {e}"))
        })?;
        let reversed_paths = compiled
            .capture_names()
            .enumerate()
            .filter_map(|(position, name)| name.map(|n| (position, n.to_string())))
            .collect();
        return Ok((compiled, reversed_paths));
    }

    let mut regex_str = String::from("^");
    let mut reversed_paths = ReversedPaths::new();

    for Placed { token, position } in place(pattern)? {
        regex_str.push_str(&token.to_regex());
        let name = match token {
            Token::Named { name, .. } => Some(name),
            Token::Shorthand(shorthand) => shorthand.param_name(),
            _ => None,
        };
        if let (Some(position), Some(name)) = (position, name) {
            reversed_paths.insert(position, name);
        }
    }

    regex_str.push('$');
    let compiled = Regex::new(&regex_str).map_err(|e| {
        UrlError::ImproperlyConfigured(format!("Invalid route pattern '{pattern}': {e}"))
    })?;
    Ok((compiled, reversed_paths))
}

/// Returns the regex between `#` delimiters, ignoring trailing flags.
pub(crate) fn raw_regex(pattern: &str) -> Option<&str> {
    let rest = pattern.strip_prefix('#')?;
    let end = rest.rfind('#')?;
    Some(&rest[..end])
}
