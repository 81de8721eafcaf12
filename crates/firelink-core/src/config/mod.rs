//! Configuration for a Firebase project
//!
//! Sources are layered: an optional file (TOML, YAML or JSON), then
//! `FIREBASE_*` environment variables. The result is validated before use.

pub mod env_loader;
pub mod file_loader;
pub mod model;
pub mod timeouts;

pub use env_loader::{apply_env_overrides, load_from_env};
pub use file_loader::load_from_file;
pub use model::{
    DEFAULT_DATABASE_HOST, DEFAULT_IDENTITY_ENDPOINT, DEFAULT_TOKEN_ENDPOINT, FirebaseConfig,
};
pub use timeouts::TimeoutConfig;

use crate::error::FirelinkResult;
use std::path::Path;

/// Load a validated config: file values first, environment on top
pub fn load_config(path: Option<&Path>) -> FirelinkResult<FirebaseConfig> {
    let base = match path {
        Some(path) => load_from_file(path)?,
        None => FirebaseConfig::default(),
    };
    let config = apply_env_overrides(base, |key| std::env::var(key).ok())?;
    config.validate()?;
    tracing::debug!(
        project_id = %config.project_id,
        database_url = %config.resolved_database_url(),
        "Loaded Firebase configuration"
    );
    Ok(config)
}
