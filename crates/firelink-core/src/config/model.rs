//! Firebase project configuration

use super::timeouts::TimeoutConfig;
use crate::error::{FirelinkError, FirelinkResult};
use serde::{Deserialize, Serialize};

/// Identity Toolkit REST base (sign-up, sign-in, out-of-band codes)
pub const DEFAULT_IDENTITY_ENDPOINT: &str = "https://identitytoolkit.googleapis.com/v1";

/// Secure Token REST base (refresh token exchange)
pub const DEFAULT_TOKEN_ENDPOINT: &str = "https://securetoken.googleapis.com/v1";

/// Host suffix of the Realtime Database for a project
pub const DEFAULT_DATABASE_HOST: &str = "firebaseio.com";

/// Everything needed to talk to one Firebase project.
///
/// Only `project_id` and `api_key` are required. The endpoint fields exist so
/// traffic can be pointed at an emulator or a test server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirebaseConfig {
    /// Project identifier, also the Realtime Database subdomain
    #[serde(default)]
    pub project_id: String,
    /// Web API key
    #[serde(default)]
    pub api_key: String,
    /// Full database base URL; derived from `project_id` when absent
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_identity_endpoint")]
    pub identity_endpoint: String,
    #[serde(default = "default_token_endpoint")]
    pub token_endpoint: String,
    #[serde(default)]
    pub timeouts: TimeoutConfig,
}

fn default_identity_endpoint() -> String {
    DEFAULT_IDENTITY_ENDPOINT.to_string()
}

fn default_token_endpoint() -> String {
    DEFAULT_TOKEN_ENDPOINT.to_string()
}

impl Default for FirebaseConfig {
    fn default() -> Self {
        Self {
            project_id: String::new(),
            api_key: String::new(),
            database_url: None,
            identity_endpoint: default_identity_endpoint(),
            token_endpoint: default_token_endpoint(),
            timeouts: TimeoutConfig::default(),
        }
    }
}

impl FirebaseConfig {
    /// Create a config for a project with default endpoints
    pub fn new(project_id: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            api_key: api_key.into(),
            ..Default::default()
        }
    }

    /// Override the database base URL
    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database_url = Some(url.into());
        self
    }

    /// Override the identity toolkit base URL
    pub fn with_identity_endpoint(mut self, url: impl Into<String>) -> Self {
        self.identity_endpoint = url.into();
        self
    }

    /// Override the secure token base URL
    pub fn with_token_endpoint(mut self, url: impl Into<String>) -> Self {
        self.token_endpoint = url.into();
        self
    }

    /// Replace the transport timeouts
    pub fn with_timeouts(mut self, timeouts: TimeoutConfig) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Database base URL without a trailing slash
    pub fn resolved_database_url(&self) -> String {
        match &self.database_url {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("https://{}.{}", self.project_id, DEFAULT_DATABASE_HOST),
        }
    }

    /// Check that the config can produce well-formed request URLs
    pub fn validate(&self) -> FirelinkResult<()> {
        if self.project_id.trim().is_empty() {
            return Err(FirelinkError::config("project_id is missing"));
        }
        if self
            .project_id
            .chars()
            .any(|c| !(c.is_ascii_alphanumeric() || c == '-'))
        {
            return Err(FirelinkError::config_with_context(
                format!("project_id '{}' is not a valid host label", self.project_id),
                "project ids may only contain ASCII letters, digits and '-'",
            ));
        }
        if self.api_key.trim().is_empty() {
            return Err(FirelinkError::config("api_key is missing"));
        }

        validate_base_url("identity_endpoint", &self.identity_endpoint)?;
        validate_base_url("token_endpoint", &self.token_endpoint)?;
        validate_base_url("database_url", &self.resolved_database_url())?;

        self.timeouts
            .validate()
            .map_err(|e| FirelinkError::config_with_context(e, "Validating timeouts"))
    }
}

fn validate_base_url(field: &str, value: &str) -> FirelinkResult<()> {
    let url = url::Url::parse(value).map_err(|e| {
        FirelinkError::config_with_context(format!("{} is not a valid URL: {}", field, e), value)
    })?;
    match url.scheme() {
        "http" | "https" => {}
        other => {
            return Err(FirelinkError::config_with_context(
                format!("{} must use http or https, got '{}'", field, other),
                value,
            ));
        }
    }
    if url.query().is_some() || url.fragment().is_some() {
        return Err(FirelinkError::config_with_context(
            format!("{} must not carry a query string or fragment", field),
            value,
        ));
    }
    Ok(())
}
