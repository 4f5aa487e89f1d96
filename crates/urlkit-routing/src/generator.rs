//! The URL generator.
//!
//! [`UrlGenerator`] produces page URLs ([`get`](UrlGenerator::get)),
//! static-asset URLs ([`get_static`](UrlGenerator::get_static)), and local
//! filesystem paths ([`path`](UrlGenerator::path)) from three prefixes:
//!
//! - the **base URI**, prepended to relative page URLs; defaults to a value
//!   derived from the request [`Environment`];
//! - the **static base URI**, prepended to asset URLs; falls back to the base
//!   URI while unset;
//! - the **base path**, prepended to local paths; defaults to empty.
//!
//! Named routes are resolved through a router obtained from a
//! [`RouterProvider`] the first time one is needed.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use urlkit_routing::urls::resolver::Router;
//! use urlkit_routing::{RouteRef, UrlGenerator};
//!
//! let mut router = Router::new();
//! router.add("blog-post", "blog/{year}/{title}").unwrap();
//!
//! let mut url = UrlGenerator::new().with_router(Arc::new(router));
//! url.set_base_uri("/invo/");
//!
//! assert_eq!(url.get("products/edit/1", None, None).unwrap(), "/invo/products/edit/1");
//!
//! let post = RouteRef::named("blog-post").param("year", "2012").param("title", "some-cool-stuff");
//! assert_eq!(url.get(post, None, None).unwrap(), "/invo/blog/2012/some-cool-stuff");
//! ```

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde_json::{Map, Value};
use tracing::{debug, trace};

use urlkit_core::logging::route_span;
use urlkit_core::{Settings, UrlError, UrlResult};

use crate::prefix::{default_base_uri, Environment, Prefix};
use crate::query::{append_query, build_query};
use crate::scheme::{has_scheme, join};
use crate::target::{RouteRef, Target};
use crate::urls::pattern::{Route, UrlBuilder};
use crate::urls::resolver::RouteLookup;
use crate::urls::reverse::substitute;

/// Supplies the router used to resolve named routes.
///
/// Returning `None` means no router is available.
pub type RouterProvider = Arc<dyn Fn() -> Option<Arc<dyn RouteLookup>> + Send + Sync>;

/// Generates URLs and paths from configured prefixes and named routes.
pub struct UrlGenerator {
    base_uri: Prefix,
    static_base_uri: Prefix,
    base_path: String,
    environment: Environment,
    default_base_uri: OnceLock<String>,
    router_provider: Option<RouterProvider>,
    router: OnceLock<Arc<dyn RouteLookup>>,
}

impl fmt::Debug for UrlGenerator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UrlGenerator")
            .field("base_uri", &self.base_uri)
            .field("static_base_uri", &self.static_base_uri)
            .field("base_path", &self.base_path)
            .field("environment", &self.environment)
            .field("has_router_provider", &self.router_provider.is_some())
            .field("router", &self.router.get())
            .finish_non_exhaustive()
    }
}

impl Default for UrlGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl UrlGenerator {
    /// Creates a generator with every prefix unset and no router.
    pub fn new() -> Self {
        Self {
            base_uri: Prefix::Unset,
            static_base_uri: Prefix::Unset,
            base_path: String::new(),
            environment: Environment::new(),
            default_base_uri: OnceLock::new(),
            router_provider: None,
            router: OnceLock::new(),
        }
    }

    /// Creates a generator from the prefixes in `settings`.
    ///
    /// A configured static base URI is applied before the base URI, so it is
    /// never overwritten by the base URI's one-time copy.
    pub fn from_settings(settings: &Settings) -> Self {
        let mut generator = Self::new();
        if let Some(script_path) = &settings.script_path {
            generator.environment = Environment::new().with_script_path(script_path.clone());
        }
        if let Some(static_base_uri) = &settings.static_base_uri {
            generator.set_static_base_uri(static_base_uri.clone());
        }
        if let Some(base_uri) = &settings.base_uri {
            generator.set_base_uri(base_uri.clone());
        }
        generator.set_base_path(settings.base_path.clone());
        generator
    }

    /// Sets the request environment the default base URI is derived from.
    #[must_use]
    pub fn with_environment(mut self, environment: Environment) -> Self {
        self.environment = environment;
        self.default_base_uri = OnceLock::new();
        self
    }

    /// Sets the provider consulted the first time a named route is generated.
    #[must_use]
    pub fn with_router_provider<F>(mut self, provider: F) -> Self
    where
        F: Fn() -> Option<Arc<dyn RouteLookup>> + Send + Sync + 'static,
    {
        self.router_provider = Some(Arc::new(provider));
        self
    }

    /// Uses `router` directly, without a provider.
    #[must_use]
    pub fn with_router(mut self, router: Arc<dyn RouteLookup>) -> Self {
        self.set_router(router);
        self
    }

    /// Replaces the cached router.
    pub fn set_router(&mut self, router: Arc<dyn RouteLookup>) -> &mut Self {
        self.router = OnceLock::from(router);
        self
    }

    // ── Prefixes ────────────────────────────────────────────────────

    /// Sets the prefix for all generated page URLs.
    ///
    /// If the static base URI has never been set, it is set to the same value.
    pub fn set_base_uri(&mut self, base_uri: impl Into<String>) -> &mut Self {
        let base_uri = base_uri.into();
        if !self.static_base_uri.is_set() {
            self.static_base_uri = Prefix::Set(base_uri.clone());
        }
        self.base_uri = Prefix::Set(base_uri);
        self
    }

    /// Returns the prefix for page URLs.
    ///
    /// While unset this is derived from the environment; the derived value is
    /// computed once and then reused.
    pub fn base_uri(&self) -> &str {
        match &self.base_uri {
            Prefix::Set(base_uri) => base_uri,
            Prefix::Unset => self
                .default_base_uri
                .get_or_init(|| default_base_uri(&self.environment)),
        }
    }

    /// Sets the prefix for all generated static-asset URLs.
    pub fn set_static_base_uri(&mut self, static_base_uri: impl Into<String>) -> &mut Self {
        self.static_base_uri = Prefix::Set(static_base_uri.into());
        self
    }

    /// Returns the prefix for static-asset URLs, falling back to [`base_uri`](Self::base_uri).
    pub fn static_base_uri(&self) -> &str {
        self.static_base_uri
            .as_deref()
            .unwrap_or_else(|| self.base_uri())
    }

    /// Sets the prefix for local paths.
    pub fn set_base_path(&mut self, base_path: impl Into<String>) -> &mut Self {
        self.base_path = base_path.into();
        self
    }

    /// Returns the filesystem prefix used by [`UrlGenerator::path`].
    pub fn base_path(&self) -> &str {
        &self.base_path
    }

    // ── Generation ──────────────────────────────────────────────────

    /// Generates a URL for a literal path or a named route.
    ///
    /// - A path with an explicit scheme (`mailto:`, `https://`) is returned
    ///   as-is, whatever `local` says.
    /// - Any other path is prefixed with the base URI unless `local` is
    ///   `Some(false)`.
    /// - A [`RouteRef`] is resolved by name and its parameters substituted
    ///   into the route pattern, or handed to the route's custom builder.
    ///
    /// A non-empty `args` map is appended as a query string.
    ///
    /// # Errors
    ///
    /// - [`UrlError::MissingRouteName`] if the route reference has no name.
    /// - [`UrlError::Configuration`] if no router is available.
    /// - [`UrlError::RouteNotFound`] if the named route does not exist.
    /// - [`UrlError::MissingParameter`] if a placeholder has no value.
    pub fn get(
        &self,
        uri: impl Into<Target>,
        args: Option<&Map<String, Value>>,
        local: Option<bool>,
    ) -> UrlResult<String> {
        let base_uri = self.base_uri();

        let mut url = match uri.into() {
            Target::Path(path) => {
                let local = if path.contains(':') && has_scheme(&path) {
                    Some(false)
                } else {
                    local
                };
                if local.unwrap_or(true) {
                    join(base_uri, &path)
                } else {
                    path
                }
            }
            Target::Route(route_ref) => self.route_url(base_uri, &route_ref)?,
        };

        if let Some(args) = args.filter(|args| !args.is_empty()) {
            append_query(&mut url, &build_query(args, "&"));
        }

        trace!(url = %url, "generated url");
        Ok(url)
    }

    /// Generates a URL for a static asset.
    ///
    /// An absolute asset URL (one containing `://` with a scheme) is returned
    /// unchanged. Anything else is prefixed with the static base URI. When
    /// `args` is given it is appended as a query string, unless it serializes
    /// to nothing.
    pub fn get_static(&self, uri: &str, args: Option<&Map<String, Value>>) -> String {
        if uri.contains("://") && has_scheme(uri) {
            return uri.to_string();
        }

        let mut url = join(self.static_base_uri(), uri);
        if let Some(args) = args {
            append_query(&mut url, &build_query(args, "&"));
        }

        trace!(url = %url, "generated static url");
        url
    }

    /// Prefixes `fragment` with the base path.
    pub fn path(&self, fragment: &str) -> String {
        join(&self.base_path, fragment)
    }

    // ── Route resolution ────────────────────────────────────────────

    /// Looks up the route called `name`, fetching the router on first use.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError::Configuration`] if no router is available and
    /// [`UrlError::RouteNotFound`] if no route has that name.
    pub fn resolve_route(&self, name: &str) -> UrlResult<&Route> {
        self.router()?.route_by_name(name).ok_or_else(|| {
            debug!(route = name, "route not found");
            UrlError::RouteNotFound(name.to_string())
        })
    }

    fn router(&self) -> UrlResult<&Arc<dyn RouteLookup>> {
        if let Some(router) = self.router.get() {
            return Ok(router);
        }

        let provider = self.router_provider.as_ref().ok_or_else(|| {
            UrlError::Configuration(
                "A router provider is required to generate URLs for named routes".to_string(),
            )
        })?;
        let router = provider().ok_or_else(|| {
            UrlError::Configuration("The \"router\" service was not found".to_string())
        })?;

        debug!("caching router from provider");
        Ok(self.router.get_or_init(|| router))
    }

    fn route_url(&self, base_uri: &str, route_ref: &RouteRef) -> UrlResult<String> {
        let name = route_ref.name().ok_or(UrlError::MissingRouteName)?;
        let span = route_span(name);
        let _guard = span.enter();

        let route = self.resolve_route(name)?;
        if let UrlBuilder::Custom(builder) = route.url_builder() {
            return Ok(builder(base_uri, route.reversed_paths(), route_ref));
        }

        let path = substitute(route.pattern(), route.reversed_paths(), route_ref)?;
        if route_ref.hostname() {
            let hostname = route.hostname().unwrap_or_default();
            Ok(format!("{hostname}{base_uri}{path}"))
        } else {
            Ok(join(base_uri, &path))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use serde_json::json;

    use super::*;
    use crate::urls::resolver::Router;

    fn blog_router() -> Arc<dyn RouteLookup> {
        let mut router = Router::new();
        router.add("blog-post", "/blog/{year}/{title}").unwrap();
        Arc::new(router)
    }

    fn generator(base_uri: &str) -> UrlGenerator {
        let mut url = UrlGenerator::new().with_router(blog_router());
        url.set_base_uri(base_uri);
        url
    }

    // ── Prefixes ────────────────────────────────────────────────────

    #[test]
    fn test_base_uri_defaults_to_root() {
        let url = UrlGenerator::new();
        assert_eq!(url.base_uri(), "/");
        assert_eq!(url.static_base_uri(), "/");
        assert_eq!(url.base_path(), "");
    }

    #[test]
    fn test_base_uri_default_from_environment_is_stable() {
        let url = UrlGenerator::new()
            .with_environment(Environment::new().with_script_path("/invo/public/index.php"));
        let first = url.base_uri().to_string();
        assert_eq!(first, "/public/");
        assert_eq!(url.base_uri(), first);
    }

    #[test]
    fn test_set_base_uri_copies_into_unset_static() {
        let mut url = UrlGenerator::new();
        url.set_base_uri("/invo/");
        assert_eq!(url.base_uri(), "/invo/");
        assert_eq!(url.static_base_uri(), "/invo/");

        // The copy happens once; later base changes leave the static prefix alone.
        url.set_base_uri("/shop/");
        assert_eq!(url.base_uri(), "/shop/");
        assert_eq!(url.static_base_uri(), "/invo/");
    }

    #[test]
    fn test_explicit_static_base_uri_is_kept() {
        let mut url = UrlGenerator::new();
        url.set_static_base_uri("https://cdn.example.com/")
            .set_base_uri("/invo/");
        assert_eq!(url.static_base_uri(), "https://cdn.example.com/");
        assert_eq!(url.base_uri(), "/invo/");
    }

    #[test]
    fn test_from_settings() {
        let mut settings = Settings::default();
        settings.base_uri = Some("/invo/".to_string());
        settings.base_path = "/var/www/htdocs/".to_string();
        let url = UrlGenerator::from_settings(&settings);
        assert_eq!(url.base_uri(), "/invo/");
        assert_eq!(url.static_base_uri(), "/invo/");
        assert_eq!(url.path("index.php"), "/var/www/htdocs/index.php");
    }

    #[test]
    fn test_from_settings_static_and_script_path() {
        let mut settings = Settings::default();
        settings.static_base_uri = Some("https://cdn.example.com/".to_string());
        settings.script_path = Some("/store/index.php".to_string());
        let url = UrlGenerator::from_settings(&settings);
        assert_eq!(url.base_uri(), "/store/");
        assert_eq!(url.static_base_uri(), "https://cdn.example.com/");
    }

    // ── Literal paths ───────────────────────────────────────────────

    #[test]
    fn test_get_literal_path() {
        let url = generator("/invo/");
        assert_eq!(url.get("products/edit/1", None, None).unwrap(), "/invo/products/edit/1");
        assert_eq!(
            url.get("products/edit/1", None, Some(true)).unwrap(),
            "/invo/products/edit/1"
        );
    }

    #[test]
    fn test_get_non_local_path() {
        let url = generator("/invo/");
        assert_eq!(url.get("products/edit/1", None, Some(false)).unwrap(), "products/edit/1");
    }

    #[test]
    fn test_get_absolute_literal_ignores_local() {
        let url = generator("/invo/");
        for local in [None, Some(true), Some(false)] {
            assert_eq!(url.get("mailto:a@b.com", None, local).unwrap(), "mailto:a@b.com");
            assert_eq!(
                url.get("https://example.com/x", None, local).unwrap(),
                "https://example.com/x"
            );
        }
    }

    #[test]
    fn test_get_colon_without_scheme_is_prefixed() {
        let url = generator("/invo/");
        assert_eq!(url.get("/at:noon", None, None).unwrap(), "/invo//at:noon");
    }

    #[test]
    fn test_get_absent_uri() {
        let url = generator("/invo/");
        assert_eq!(url.get(None::<&str>, None, None).unwrap(), "/invo/");
        assert_eq!(url.get(Target::default(), None, None).unwrap(), "/invo/");
    }

    #[test]
    fn test_get_with_query() {
        let url = generator("/invo/");
        let args = json!({"page": 2});
        assert_eq!(
            url.get("products/edit/1", args.as_object(), None).unwrap(),
            "/invo/products/edit/1?page=2"
        );
        assert_eq!(
            url.get("products?sort=asc", args.as_object(), None).unwrap(),
            "/invo/products?sort=asc&page=2"
        );
    }

    #[test]
    fn test_get_with_empty_args() {
        let url = generator("/invo/");
        let args = json!({});
        assert_eq!(url.get("products", args.as_object(), None).unwrap(), "/invo/products");
    }

    // ── Named routes ────────────────────────────────────────────────

    #[test]
    fn test_get_named_route() {
        let url = generator("/invo");
        let post = RouteRef::named("blog-post").param("title", "x").param("year", "2012");
        assert_eq!(url.get(post, None, None).unwrap(), "/invo/blog/2012/x");
    }

    #[test]
    fn test_get_named_route_with_query() {
        let url = generator("");
        let post = RouteRef::named("blog-post").param("title", "x").param("year", "2012");
        let args = json!({"ref": "home page"});
        assert_eq!(
            url.get(post, args.as_object(), None).unwrap(),
            "/blog/2012/x?ref=home+page"
        );
    }

    #[test]
    fn test_get_named_route_with_hostname() {
        let mut router = Router::new();
        router.add_route(
            Route::new("blog-post", "/blog/{title}")
                .unwrap()
                .with_hostname("https://blog.example.com"),
        );
        let mut url = UrlGenerator::new().with_router(Arc::new(router));
        url.set_base_uri("/app");

        let post = RouteRef::named("blog-post").param("title", "x").with_hostname(true);
        assert_eq!(
            url.get(post, None, None).unwrap(),
            "https://blog.example.com/app/blog/x"
        );
    }

    #[test]
    fn test_get_hostname_requested_without_route_hostname() {
        let url = generator("/app");
        let post = RouteRef::named("blog-post")
            .param("title", "x")
            .param("year", "2012")
            .with_hostname(true);
        assert_eq!(url.get(post, None, None).unwrap(), "/app/blog/2012/x");
    }

    #[test]
    fn test_get_custom_builder() {
        let mut router = Router::new();
        router.add_route(Route::new("blog-post", "/blog/{year}/{title}").unwrap().with_url_builder(
            |base_uri, paths, route_ref| {
                format!(
                    "{base_uri}posts/{}?{}",
                    route_ref.get("title").unwrap_or_default(),
                    paths.len()
                )
            },
        ));
        let mut url = UrlGenerator::new().with_router(Arc::new(router));
        url.set_base_uri("/invo/");

        let post = RouteRef::named("blog-post").param("title", "x");
        assert_eq!(url.get(post, None, None).unwrap(), "/invo/posts/x?2");
    }

    #[test]
    fn test_get_route_not_found() {
        let url = generator("/");
        let err = url.get(RouteRef::named("missing-route"), None, None).unwrap_err();
        assert!(matches!(&err, UrlError::RouteNotFound(name) if name == "missing-route"));
    }

    #[test]
    fn test_get_missing_route_name() {
        let url = generator("/");
        let err = url.get(RouteRef::default().param("title", "x"), None, None).unwrap_err();
        assert!(matches!(err, UrlError::MissingRouteName));
    }

    #[test]
    fn test_get_missing_parameter() {
        let url = generator("/");
        let err = url
            .get(RouteRef::named("blog-post").param("year", "2012"), None, None)
            .unwrap_err();
        assert!(matches!(err, UrlError::MissingParameter { .. }));
    }

    #[test]
    fn test_get_named_route_without_router() {
        let url = UrlGenerator::new();
        let err = url.get(RouteRef::named("blog-post"), None, None).unwrap_err();
        assert!(matches!(err, UrlError::Configuration(_)));
    }

    #[test]
    fn test_get_provider_without_router() {
        let url = UrlGenerator::new().with_router_provider(|| None);
        let err = url.get(RouteRef::named("blog-post"), None, None).unwrap_err();
        assert!(matches!(err, UrlError::Configuration(_)));
    }

    #[test]
    fn test_router_provider_called_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut url = UrlGenerator::new().with_router_provider(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Some(blog_router())
        });
        url.set_base_uri("");

        let post = RouteRef::named("blog-post").param("title", "x").param("year", "2012");
        url.get(post.clone(), None, None).unwrap();
        url.get(post, None, None).unwrap();
        assert!(url.resolve_route("missing").is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_set_router_replaces_cached() {
        let mut url = generator("");
        let mut other = Router::new();
        other.add("blog-post", "/posts/{title}").unwrap();
        url.set_router(Arc::new(other));

        let post = RouteRef::named("blog-post").param("title", "x");
        assert_eq!(url.get(post, None, None).unwrap(), "/posts/x");
    }

    #[test]
    fn test_literal_paths_need_no_router() {
        let url = UrlGenerator::new();
        assert_eq!(url.get("about", None, None).unwrap(), "/about");
    }

    // ── Static assets and paths ─────────────────────────────────────

    #[test]
    fn test_get_static_absolute_unchanged() {
        let url = generator("/invo/");
        assert_eq!(
            url.get_static("https://cdn.example.com/a.js", None),
            "https://cdn.example.com/a.js"
        );
        let args = json!({"v": 3});
        assert_eq!(
            url.get_static("https://cdn.example.com/a.js", args.as_object()),
            "https://cdn.example.com/a.js"
        );
    }

    #[test]
    fn test_get_static_uses_static_base() {
        let mut url = generator("/invo/");
        url.set_static_base_uri("https://cdn.example.com/");
        assert_eq!(url.get_static("css/app.css", None), "https://cdn.example.com/css/app.css");
    }

    #[test]
    fn test_get_static_falls_back_to_base_default() {
        let url = UrlGenerator::new();
        assert_eq!(url.get_static("css/app.css", None), "/css/app.css");
    }

    #[test]
    fn test_get_static_with_query() {
        let url = generator("/");
        let args = json!({"v": 3});
        assert_eq!(url.get_static("app.js", args.as_object()), "/app.js?v=3");
        assert_eq!(url.get_static("app.js?x=1", args.as_object()), "/app.js?x=1&v=3");
        let empty = json!({});
        assert_eq!(url.get_static("app.js", empty.as_object()), "/app.js");
    }

    #[test]
    fn test_get_static_protocol_relative_is_prefixed() {
        let url = generator("/invo/");
        assert_eq!(url.get_static("//cdn.example.com/a.js", None), "/invo///cdn.example.com/a.js");
    }

    #[test]
    fn test_path() {
        let mut url = UrlGenerator::new();
        assert_eq!(url.path("index.php"), "index.php");
        url.set_base_path("/var/www/htdocs/");
        assert_eq!(url.path("index.php"), "/var/www/htdocs/index.php");
        assert_eq!(url.path(""), "/var/www/htdocs/");
    }

    #[test]
    fn test_debug_output() {
        let url = generator("/invo/");
        let debug = format!("{url:?}");
        assert!(debug.contains("UrlGenerator"));
        assert!(debug.contains("/invo/"));
    }
}
