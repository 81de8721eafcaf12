//! Error types for Firelink
//!
//! Remote rejections (a non-2xx answer from the identity, token or database
//! endpoint) are never errors: operations report them through `None` or
//! `false`. The variants here cover local precondition violations, encoding
//! problems and transport failures where no HTTP response was received.
//!
//! All errors implement the `UnifiedError` trait which provides:
//! - error_code: A stable identifier for programmatic error handling
//! - message: Human-readable error message
//! - context: Optional additional context about where/why the error occurred

mod constructors;
mod conversions;
mod types;
mod unified_error;

pub use types::{FirelinkError, FirelinkResult, UnifiedError};
