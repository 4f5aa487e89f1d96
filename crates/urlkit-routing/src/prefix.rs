//! URL prefixes and the environment they default from.
//!
//! A [`Prefix`] records whether a prefix was ever explicitly configured.
//! An unset base URI defaults to [`default_base_uri`], a pure function of
//! the request [`Environment`].

/// A prefix that is either unset or explicitly configured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Prefix {
    /// Never configured; readers fall back to a default.
    #[default]
    Unset,
    /// Explicitly configured.
    Set(String),
}

impl Prefix {
    /// Returns the configured value, or `None` if unset.
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Self::Unset => None,
            Self::Set(value) => Some(value),
        }
    }

    /// Returns `true` once a prefix has been assigned, even an empty one.
    pub const fn is_set(&self) -> bool {
        matches!(self, Self::Set(_))
    }
}

impl From<Option<String>> for Prefix {
    fn from(value: Option<String>) -> Self {
        value.map_or(Self::Unset, Self::Set)
    }
}

/// What URL generation knows about the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Environment {
    script_path: Option<String>,
}

impl Environment {
    /// Creates an environment with no request information.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the path of the script serving the request (e.g. `/invo/public/index.php`).
    #[must_use]
    pub fn with_script_path(mut self, script_path: impl Into<String>) -> Self {
        self.script_path = Some(script_path.into());
        self
    }

    /// Returns the path of the script serving the request, if known.
    pub fn script_path(&self) -> Option<&str> {
        self.script_path.as_deref()
    }
}

/// Derives the default base URI from the request's script path.
///
/// The directory holding the script becomes `/<dir>/`. Without a
/// script path, or when the script sits at the root, the default is `/`.
///
/// # Examples
///
/// ```
/// use urlkit_routing::prefix::{default_base_uri, Environment};
///
/// let env = Environment::new().with_script_path("/invo/public/index.php");
/// assert_eq!(default_base_uri(&env), "/public/");
/// assert_eq!(default_base_uri(&Environment::new()), "/");
/// ```
pub fn default_base_uri(environment: &Environment) -> String {
    match environment.script_path().map(script_dir) {
        Some(dir) if !dir.is_empty() && dir != "0" => format!("/{dir}/"),
        _ => "/".to_string(),
    }
}

/// Returns the segment between the last two path separators of `path`.
fn script_dir(path: &str) -> &str {
    let mut separators = path
        .rmatch_indices(|c: char| c == '/' || c == '\\')
        .map(|(index, _)| index);
    match (separators.next(), separators.next()) {
        (Some(last), Some(previous)) => &path[previous + 1..last],
        _ => "",
    }
}
