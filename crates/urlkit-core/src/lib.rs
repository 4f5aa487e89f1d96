//! # urlkit-core
//!
//! Error types, settings, and logging shared by the urlkit crates.
//! This crate has no routing logic of its own.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`settings`] - URL prefix and logging configuration
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod logging;
pub mod settings;
pub mod settings_loader;

// Re-export the most commonly used types at the crate root.
pub use error::{UrlError, UrlResult};
pub use settings::Settings;
