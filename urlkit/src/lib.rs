//! # urlkit
//!
//! URL generation for web applications.
//!
//! This is the meta-crate that re-exports the sub-crates for convenient access.
//! You can depend on `urlkit` to get everything, or depend on individual
//! crates for finer-grained control.

/// Error types, settings, and logging.
pub use urlkit_core as core;

/// URL generator, route table, and reverse resolution.
pub use urlkit_routing as routing;

/// Commonly used items in one import.
pub mod prelude {
    pub use urlkit_core::{Settings, UrlError, UrlResult};
    pub use urlkit_routing::{RouteRef, Router, Target, UrlGenerator};
}

// Re-export third-party crates so downstream code uses matching versions.
pub use serde_json;
pub use tracing;
