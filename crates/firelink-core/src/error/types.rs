//! Core error types and traits for Firelink

use thiserror::Error;

/// Result type alias for Firelink operations
pub type FirelinkResult<T> = Result<T, FirelinkError>;

/// Unified error trait that all Firelink errors implement.
pub trait UnifiedError: std::error::Error + Send + Sync {
    /// Get the error code for programmatic handling
    fn error_code(&self) -> &str;

    /// Get the human-readable error message
    fn message(&self) -> &str;

    /// Get optional context about the error
    fn context(&self) -> Option<&str> {
        None
    }

    /// Whether the failure happened locally, before any request was sent
    fn is_local(&self) -> bool {
        false
    }
}

/// Main error type for Firelink
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FirelinkError {
    /// Missing or malformed configuration (project id, api key, endpoints)
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// Navigation or construction of a database path that cannot exist
    #[error("Invalid path '{path}': {message}")]
    InvalidPath { path: String, message: String },

    /// A required argument was empty or malformed
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        field: Option<String>,
    },

    /// The transport could not produce an HTTP response
    #[error("HTTP error: {message}")]
    Http {
        message: String,
        url: Option<String>,
        status_code: Option<u16>,
    },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {message}")]
    Json {
        message: String,
        context: Option<String>,
    },

    /// IO errors
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    /// Lookup of something that was never registered
    #[error("Not found: {message}")]
    NotFound {
        message: String,
        resource_type: Option<String>,
    },

    /// Generic error with context
    #[error("Error: {message}")]
    Other {
        message: String,
        context: Option<String>,
    },
}
