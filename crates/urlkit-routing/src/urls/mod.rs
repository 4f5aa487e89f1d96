//! Routes and reverse resolution.
//!
//! This module provides the route-table side of URL generation:
//!
//! - [`converters`]: `:controller`-style shorthand placeholders
//! - [`pattern`]: Route patterns, compilation, and reversed-path templates
//! - [`resolver`]: Named route lookup and the in-memory [`Router`](resolver::Router)
//! - [`reverse`]: Substituting parameters into a route pattern
//!
//! # Examples
//!
//! ```
//! use urlkit_routing::urls::resolver::{RouteLookup, Router};
//! use urlkit_routing::urls::reverse::substitute;
//! use urlkit_routing::RouteRef;
//!
//! let mut router = Router::new();
//! router.add("article-year", "/articles/{year:[0-9]+}/").unwrap();
//!
//! let route = router.route_by_name("article-year").unwrap();
//! let params = RouteRef::named("article-year").param("year", "2024");
//! let path = substitute(route.pattern(), route.reversed_paths(), &params).unwrap();
//! assert_eq!(path, "/articles/2024/");
//! ```

pub mod converters;
pub mod pattern;
pub mod resolver;
pub mod reverse;
