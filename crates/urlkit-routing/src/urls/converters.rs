//! Shorthand placeholders for route patterns.
//!
//! A route pattern may use `:name` tokens instead of spelling out a capture
//! group. Each shorthand expands to a fixed regex when the pattern is
//! compiled and occupies one position in the reversed-path template.
//!
//! | Token        | Regex                 | Reversed-path name |
//! |--------------|-----------------------|--------------------|
//! | `:module`    | `([\w-]+)`            | `module`           |
//! | `:namespace` | `([\w-]+)`            | `namespace`        |
//! | `:controller`| `([\w-]+)`            | `controller`       |
//! | `:action`    | `([\w-]+)`            | `action`           |
//! | `:params`    | `(/.*)*`              | `params`           |
//! | `:int`       | `([0-9]+)`            | (anonymous)        |
//!
//! A shorthand is only recognized directly after a `/`, so `/time:action`
//! is literal text. `:params` takes that slash with it: `/:controller/:params`
//! compiles to `/([\w-]+)(/.*)*` and matches both `/posts` and `/posts/a/b`.

use std::fmt;

/// One of the built-in `:name` placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shorthand {
    /// `:module`
    Module,
    /// `:namespace`
    Namespace,
    /// `:controller`
    Controller,
    /// `:action`
    Action,
    /// `:params`, the trailing `/a/b/c` segment list. May be empty.
    Params,
    /// `:int`
    Int,
}

impl Shorthand {
    /// Looks up a shorthand by its token name (without the leading `:`).
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "module" => Some(Self::Module),
            "namespace" => Some(Self::Namespace),
            "controller" => Some(Self::Controller),
            "action" => Some(Self::Action),
            "params" => Some(Self::Params),
            "int" => Some(Self::Int),
            _ => None,
        }
    }

    /// Returns the token name (without the leading `:`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::Module => "module",
            Self::Namespace => "namespace",
            Self::Controller => "controller",
            Self::Action => "action",
            Self::Params => "params",
            Self::Int => "int",
        }
    }

    /// Returns the capture group this shorthand compiles to.
    pub const fn regex(self) -> &'static str {
        match self {
            Self::Module | Self::Namespace | Self::Controller | Self::Action => r"([\w-]+)",
            Self::Params => "(/.*)*",
            Self::Int => "([0-9]+)",
        }
    }

    /// Returns the parameter name recorded in the reversed-path template, if any.
    pub const fn param_name(self) -> Option<&'static str> {
        match self {
            Self::Int => None,
            other => Some(other.name()),
        }
    }

    /// Returns `true` if the compiled group may match the empty string.
    ///
    /// Optional shorthands substitute to an empty segment when no value is given.
    pub const fn is_optional(self) -> bool {
        matches!(self, Self::Params)
    }
}

impl fmt::Display for Shorthand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":{}", self.name())
    }
}
