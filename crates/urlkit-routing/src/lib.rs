//! # urlkit-routing
//!
//! URL generation for web applications: prefixed page URLs, static-asset
//! URLs, local paths, and reverse resolution of named routes.
//!
//! ## Modules
//!
//! - [`generator`] - The [`UrlGenerator`] facade
//! - [`target`] - What to generate a URL for: a literal path or a [`RouteRef`]
//! - [`prefix`] - Base URI state and its environment-derived default
//! - [`query`] - Query string serialization
//! - [`scheme`] - Scheme detection and prefix joining
//! - [`urls`] - Route patterns, the route table, and parameter substitution

pub mod generator;
pub mod prefix;
pub mod query;
pub mod scheme;
pub mod target;
pub mod urls;

// Re-export the most commonly used types at the crate root.
pub use generator::{RouterProvider, UrlGenerator};
pub use prefix::{Environment, Prefix};
pub use target::{RouteRef, Target};
pub use urls::pattern::{ReversedPaths, Route, UrlBuilder};
pub use urls::resolver::{RouteLookup, Router};
