//! Environment variable-based configuration loading

use super::model::FirebaseConfig;
use crate::error::{FirelinkError, FirelinkResult};
use std::env;

pub const ENV_PROJECT_ID: &str = "FIREBASE_PROJECT_ID";
pub const ENV_API_KEY: &str = "FIREBASE_API_KEY";
pub const ENV_DATABASE_URL: &str = "FIREBASE_DATABASE_URL";
pub const ENV_IDENTITY_ENDPOINT: &str = "FIREBASE_IDENTITY_ENDPOINT";
pub const ENV_TOKEN_ENDPOINT: &str = "FIREBASE_TOKEN_ENDPOINT";
pub const ENV_CONNECT_TIMEOUT: &str = "FIREBASE_CONNECT_TIMEOUT_SECS";
pub const ENV_REQUEST_TIMEOUT: &str = "FIREBASE_REQUEST_TIMEOUT_SECS";

/// Load configuration from process environment variables
pub fn load_from_env() -> FirelinkResult<FirebaseConfig> {
    apply_env_overrides(FirebaseConfig::default(), |key| env::var(key).ok())
}

/// Overlay variables found through `lookup` on top of `config`.
///
/// Empty values are ignored so an exported-but-blank variable does not wipe
/// a value that came from a file.
pub fn apply_env_overrides<F>(mut config: FirebaseConfig, lookup: F) -> FirelinkResult<FirebaseConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(project_id) = get(ENV_PROJECT_ID) {
        config.project_id = project_id;
    }
    if let Some(api_key) = get(ENV_API_KEY) {
        config.api_key = api_key;
    }
    if let Some(url) = get(ENV_DATABASE_URL) {
        config.database_url = Some(url);
    }
    if let Some(url) = get(ENV_IDENTITY_ENDPOINT) {
        config.identity_endpoint = url;
    }
    if let Some(url) = get(ENV_TOKEN_ENDPOINT) {
        config.token_endpoint = url;
    }
    if let Some(secs) = get(ENV_CONNECT_TIMEOUT) {
        config.timeouts.connect_timeout_secs = parse_secs(ENV_CONNECT_TIMEOUT, &secs)?;
    }
    if let Some(secs) = get(ENV_REQUEST_TIMEOUT) {
        config.timeouts.request_timeout_secs = parse_secs(ENV_REQUEST_TIMEOUT, &secs)?;
    }

    Ok(config)
}

fn parse_secs(key: &str, value: &str) -> FirelinkResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| FirelinkError::config(format!("Invalid {} value: '{}'", key, value)))
}
