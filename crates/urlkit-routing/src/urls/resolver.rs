//! Named route lookup.
//!
//! [`RouteLookup`] is the capability URL generation needs from a router:
//! find a route by name. [`Router`] is an in-memory route table that
//! implements it.

use std::fmt;

use urlkit_core::UrlResult;

use super::pattern::Route;

/// Finds routes by name.
pub trait RouteLookup: Send + Sync + fmt::Debug {
    /// Returns the route registered under `name`, if any.
    fn route_by_name(&self, name: &str) -> Option<&Route>;
}

/// An ordered table of named routes.
///
/// # Examples
///
/// ```
/// use urlkit_routing::urls::resolver::{RouteLookup, Router};
///
/// let mut router = Router::new();
/// router.add("blog-post", "/blog/{year}/{title}").unwrap();
///
/// let route = router.route_by_name("blog-post").unwrap();
/// assert_eq!(route.pattern(), "/blog/{year}/{title}");
/// assert!(router.route_by_name("missing").is_none());
/// ```
#[derive(Debug, Default, Clone)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Creates an empty router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compiles `pattern` and registers it under `name`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pattern cannot be compiled.
    pub fn add(&mut self, name: &str, pattern: &str) -> UrlResult<&mut Self> {
        let route = Route::new(name, pattern)?;
        Ok(self.add_route(route))
    }

    /// Registers a prepared route, replacing any route with the same name.
    pub fn add_route(&mut self, route: Route) -> &mut Self {
        match self.routes.iter_mut().find(|r| r.name() == route.name()) {
            Some(existing) => {
                tracing::debug!(route = route.name(), "replacing route");
                *existing = route;
            }
            None => self.routes.push(route),
        }
        self
    }

    /// Returns all registered routes in registration order.
    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Returns the number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if no route is registered.
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl RouteLookup for Router {
    fn route_by_name(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.name() == name)
    }
}
