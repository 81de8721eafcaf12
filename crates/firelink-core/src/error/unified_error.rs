//! UnifiedError trait implementation for FirelinkError

use super::types::{FirelinkError, UnifiedError};

impl UnifiedError for FirelinkError {
    fn error_code(&self) -> &str {
        match self {
            Self::Config { .. } => "FIRELINK_CONFIG",
            Self::InvalidPath { .. } => "FIRELINK_INVALID_PATH",
            Self::InvalidInput { .. } => "FIRELINK_INVALID_INPUT",
            Self::Http { .. } => "FIRELINK_HTTP",
            Self::Json { .. } => "FIRELINK_JSON",
            Self::Io { .. } => "FIRELINK_IO",
            Self::NotFound { .. } => "FIRELINK_NOT_FOUND",
            Self::Other { .. } => "FIRELINK_OTHER",
        }
    }

    fn message(&self) -> &str {
        match self {
            Self::Config { message, .. } => message,
            Self::InvalidPath { message, .. } => message,
            Self::InvalidInput { message, .. } => message,
            Self::Http { message, .. } => message,
            Self::Json { message, .. } => message,
            Self::Io { message, .. } => message,
            Self::NotFound { message, .. } => message,
            Self::Other { message, .. } => message,
        }
    }

    fn context(&self) -> Option<&str> {
        match self {
            Self::Config { context, .. } => context.as_deref(),
            Self::InvalidPath { path, .. } => Some(path),
            Self::InvalidInput { field, .. } => field.as_deref(),
            Self::Http { url, .. } => url.as_deref(),
            Self::Json { context, .. } => context.as_deref(),
            Self::Io { path, .. } => path.as_deref(),
            Self::NotFound { resource_type, .. } => resource_type.as_deref(),
            Self::Other { context, .. } => context.as_deref(),
        }
    }

    fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Config { .. } | Self::InvalidPath { .. } | Self::InvalidInput { .. }
        )
    }
}
