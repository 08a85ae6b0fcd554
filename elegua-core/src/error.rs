//! Error types for Elegua.
//!
//! This module provides a structured error hierarchy using `thiserror`:
//!
//! - [`EleguaError`] - Top-level error type for all Elegua operations
//! - [`CompileError`] - Errors raised while compiling or reversing a route pattern
//! - [`NavigationError`] - Errors raised by a navigation that could not be committed
//!
//! A vetoed navigation and a path that matches no route are not errors.

use thiserror::Error;

/// A boxed error type for dynamic error handling.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Top-level error type for all Elegua operations.
#[derive(Error, Debug)]
pub enum EleguaError {
    /// A route pattern could not be compiled.
    #[error("compile error: {0}")]
    Compile(#[from] CompileError),

    /// A navigation could not be committed.
    #[error("navigation error: {0}")]
    Navigation(#[from] NavigationError),

    /// A custom error occurred.
    #[error(transparent)]
    Custom(BoxError),
}

/// Errors that can occur while compiling a route pattern.
///
/// These are raised synchronously to the caller of the compile or resolve
/// operation and are never retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// A `:name` segment has an empty or malformed parameter name.
    #[error("invalid parameter segment `{segment}` in route `{pattern}`")]
    InvalidParameter {
        /// The route being compiled.
        pattern: String,
        /// The offending segment.
        segment: String,
    },

    /// The same parameter name is used twice.
    #[error("parameter `{name}` appears more than once in route `{pattern}`")]
    DuplicateParameter {
        /// The route being compiled.
        pattern: String,
        /// The repeated parameter name.
        name: String,
    },

    /// The generated expression was rejected by the regex engine.
    #[error("route `{pattern}` does not compile: {message}")]
    Regex {
        /// The route being compiled.
        pattern: String,
        /// The regex engine's message.
        message: String,
    },

    /// A parameter required to reverse a route was not supplied.
    #[error("missing parameter `{name}` for route `{pattern}`")]
    MissingParameter {
        /// The route being reversed.
        pattern: String,
        /// The missing parameter name.
        name: String,
    },

    /// Raw expressions have no template to reverse.
    #[error("route `{pattern}` is a raw expression and cannot be reversed")]
    NotReversible {
        /// The expression source.
        pattern: String,
    },
}

/// Errors that can occur while committing a navigation.
///
/// A failed navigation never leaves partial state behind: the history stack
/// and every published value are exactly as they were before the attempt.
#[derive(Error, Debug)]
pub enum NavigationError {
    /// The target could not be parsed or resolved against the current location.
    #[error("invalid url `{href}`")]
    InvalidUrl {
        /// The href as given by the caller.
        href: String,
        /// The underlying parse failure.
        #[source]
        source: url::ParseError,
    },

    /// A navigation was requested while another one was being applied.
    #[error("another navigation is in flight")]
    InFlight,

    /// The platform history refused the new entry.
    #[error("history update failed")]
    History(#[source] BoxError),
}

// Convenience conversions
impl From<BoxError> for EleguaError {
    fn from(err: BoxError) -> Self {
        EleguaError::Custom(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compile_error_display() {
        let err = CompileError::DuplicateParameter {
            pattern: "/:id/:id".into(),
            name: "id".into(),
        };
        assert_eq!(
            err.to_string(),
            "parameter `id` appears more than once in route `/:id/:id`"
        );
    }

    #[test]
    fn test_navigation_error_source() {
        use std::error::Error as _;

        let source = url::Url::parse("not a url").unwrap_err();
        let err = NavigationError::InvalidUrl {
            href: "not a url".into(),
            source,
        };
        assert!(err.source().is_some());
        assert_eq!(err.to_string(), "invalid url `not a url`");
    }

    #[test]
    fn test_top_level_wraps() {
        let err: EleguaError = NavigationError::InFlight.into();
        assert!(matches!(err, EleguaError::Navigation(NavigationError::InFlight)));
        assert_eq!(
            err.to_string(),
            "navigation error: another navigation is in flight"
        );
    }
}
