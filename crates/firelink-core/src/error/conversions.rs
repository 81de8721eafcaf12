//! From trait implementations for FirelinkError conversions

use super::types::FirelinkError;

impl From<anyhow::Error> for FirelinkError {
    fn from(error: anyhow::Error) -> Self {
        Self::other(error.to_string())
    }
}

impl From<std::io::Error> for FirelinkError {
    fn from(error: std::io::Error) -> Self {
        Self::io(error.to_string())
    }
}

impl From<serde_json::Error> for FirelinkError {
    fn from(error: serde_json::Error) -> Self {
        Self::json(error.to_string())
    }
}

impl From<url::ParseError> for FirelinkError {
    fn from(error: url::ParseError) -> Self {
        Self::config(format!("Invalid URL: {}", error))
    }
}

impl From<reqwest::Error> for FirelinkError {
    fn from(error: reqwest::Error) -> Self {
        let status_code = error.status().map(|s| s.as_u16());
        let url = error.url().map(|u| u.to_string());
        Self::Http {
            message: error.to_string(),
            url,
            status_code,
        }
    }
}
