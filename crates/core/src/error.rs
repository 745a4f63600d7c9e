//! Error types for the curator engine
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Filters deliberately have no error type: a malformed item degrades to a
//! pertinence of 0 inside the filter, it never propagates.

use thiserror::Error;

/// Result type alias for curator operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the curator engine
#[derive(Debug, Error)]
pub enum Error {
    /// The text index could not be built from the catalog
    #[error("index build failed: {0}")]
    IndexBuild(String),

    /// A query against the text index failed
    #[error("index query failed: {0}")]
    Query(String),

    /// A chosen category path does not exist in the tags tree,
    /// or its ancestor chain does not match the tree
    #[error("unknown category: {0}")]
    UnknownCategory(String),

    /// The session has been shut down and accepts no further work
    #[error("session is shut down")]
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_index_build() {
        let err = Error::IndexBuild("worker exited".to_string());
        let msg = err.to_string();
        assert!(msg.contains("index build failed"));
        assert!(msg.contains("worker exited"));
    }

    #[test]
    fn test_error_display_query() {
        let err = Error::Query("backend unavailable".to_string());
        let msg = err.to_string();
        assert!(msg.contains("index query failed"));
        assert!(msg.contains("backend unavailable"));
    }

    #[test]
    fn test_error_display_unknown_category() {
        let err = Error::UnknownCategory("tools/unknown".to_string());
        let msg = err.to_string();
        assert!(msg.contains("unknown category"));
        assert!(msg.contains("tools/unknown"));
    }

    #[test]
    fn test_error_display_shutdown() {
        let err = Error::Shutdown;
        assert!(err.to_string().contains("shut down"));
    }

    #[test]
    fn test_result_type_alias() {
        fn returns_result() -> Result<i32> {
            Ok(42)
        }

        fn returns_error() -> Result<i32> {
            Err(Error::Shutdown)
        }

        assert_eq!(returns_result().unwrap(), 42);
        assert!(returns_error().is_err());
    }
}
