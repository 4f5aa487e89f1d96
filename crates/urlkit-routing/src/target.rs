//! What a URL is generated for: a literal path or a named route.
//!
//! [`Target`] is the input to [`UrlGenerator::get`](crate::UrlGenerator::get).
//! Strings convert into [`Target::Path`]; a [`RouteRef`] converts into
//! [`Target::Route`].

use std::collections::{BTreeMap, HashMap};

use serde_json::{Map, Value};

/// A reference to a named route plus the values for its placeholders.
///
/// # Examples
///
/// ```
/// use urlkit_routing::RouteRef;
///
/// let post = RouteRef::named("blog-post")
///     .param("year", "2012")
///     .param("title", "some-cool-stuff");
/// assert_eq!(post.name(), Some("blog-post"));
/// assert_eq!(post.get("year"), Some("2012"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteRef {
    name: Option<String>,
    params: HashMap<String, String>,
    positional: BTreeMap<usize, String>,
    hostname: bool,
}

impl RouteRef {
    /// Creates a reference to the route called `name`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    /// Builds a reference from a JSON object.
    ///
    /// `"for"` names the route and a truthy `"hostname"` requests a
    /// hostname-qualified URL. Keys that parse as integers fill positional
    /// slots; every other key is a named parameter. Scalars are stringified
    /// (`true` as `"1"`, `false` as `""`); nulls, arrays, and objects are
    /// skipped.
    ///
    /// ```
    /// use urlkit_routing::RouteRef;
    ///
    /// let value = serde_json::json!({"for": "blog-post", "year": 2012, "hostname": true});
    /// let route = RouteRef::from_json(value.as_object().unwrap());
    /// assert_eq!(route.name(), Some("blog-post"));
    /// assert_eq!(route.get("year"), Some("2012"));
    /// assert!(route.hostname());
    /// ```
    pub fn from_json(object: &Map<String, Value>) -> Self {
        let mut route = Self::default();
        for (key, value) in object {
            match key.as_str() {
                "for" => route.name = scalar_to_string(value),
                "hostname" => route.hostname = is_truthy(value),
                _ => {
                    let Some(text) = scalar_to_string(value) else {
                        continue;
                    };
                    match key.parse::<usize>() {
                        Ok(index) => {
                            route.positional.insert(index, text);
                        }
                        Err(_) => {
                            route.params.insert(key.clone(), text);
                        }
                    }
                }
            }
        }
        route
    }

    /// Adds a named parameter.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Appends a positional parameter.
    #[must_use]
    pub fn arg(mut self, value: impl Into<String>) -> Self {
        let next = self.positional.keys().next_back().map_or(0, |last| last + 1);
        self.positional.insert(next, value.into());
        self
    }

    /// Requests that the route's hostname be prepended.
    #[must_use]
    pub const fn with_hostname(mut self, hostname: bool) -> Self {
        self.hostname = hostname;
        self
    }

    /// Returns the route name, the `for` key.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the named parameter `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Returns the positional parameter at `index` (0-based).
    pub fn positional(&self, index: usize) -> Option<&str> {
        self.positional.get(&index).map(String::as_str)
    }

    /// Returns the named parameters, excluding `for` and `hostname`.
    pub const fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Returns whether the route's hostname should be prepended.
    pub const fn hostname(&self) -> bool {
        self.hostname
    }
}

/// The input to URL generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A literal path, relative to the base URI unless it carries a scheme.
    Path(String),
    /// A named route.
    Route(RouteRef),
}

impl Default for Target {
    fn default() -> Self {
        Self::Path(String::new())
    }
}

impl From<&str> for Target {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for Target {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

impl From<RouteRef> for Target {
    fn from(route: RouteRef) -> Self {
        Self::Route(route)
    }
}

impl<T: Into<Self>> From<Option<T>> for Target {
    fn from(target: Option<T>) -> Self {
        target.map_or_else(Self::default, Into::into)
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(true) => Some("1".to_string()),
        Value::Bool(false) => Some(String::new()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty() && s != "0",
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}
