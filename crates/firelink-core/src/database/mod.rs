//! Realtime Database access over REST
//!
//! A [`Database`] is bound to one credential context and one base URL and
//! hands out [`Reference`]s. References compose paths locally and turn each
//! read, write, update or remove into a single request against
//! `{base}/{path}.json`.

mod path;
mod reference;

pub use path::{DatabasePath, MAX_DEPTH, MAX_KEY_BYTES};
pub use reference::Reference;

use crate::config::FirebaseConfig;
use crate::credential::CredentialContext;
use crate::error::{FirelinkError, FirelinkResult};
use crate::transport::HttpTransport;
use reference::DatabaseShared;
use std::sync::Arc;
use url::Url;

/// Entry point for references into one project's database
#[derive(Clone)]
pub struct Database {
    shared: Arc<DatabaseShared>,
}

impl Database {
    /// Bind a database at `database_url` (e.g. `https://demo.firebaseio.com`)
    pub fn new(
        context: Arc<CredentialContext>,
        transport: Arc<dyn HttpTransport>,
        database_url: &str,
    ) -> FirelinkResult<Self> {
        let base = Url::parse(database_url).map_err(|e| {
            FirelinkError::config_with_context(
                format!("Invalid database URL: {}", e),
                database_url.to_string(),
            )
        })?;
        if base.cannot_be_a_base() || base.query().is_some() || base.fragment().is_some() {
            return Err(FirelinkError::config_with_context(
                "database URL must be a plain http(s) base URL",
                database_url.to_string(),
            ));
        }

        let shared = DatabaseShared::new(context, transport, base)?;
        Ok(Self {
            shared: Arc::new(shared),
        })
    }

    /// Bind the database named by `config`
    pub fn from_config(
        context: Arc<CredentialContext>,
        transport: Arc<dyn HttpTransport>,
        config: &FirebaseConfig,
    ) -> FirelinkResult<Self> {
        Self::new(context, transport, &config.resolved_database_url())
    }

    /// Reference to the database root
    pub fn root(&self) -> Reference {
        Reference::root_of(Arc::clone(&self.shared))
    }

    /// Reference to `path` (`""` or `"/"` is the root)
    pub fn reference(&self, path: &str) -> FirelinkResult<Reference> {
        Reference::new(Arc::clone(&self.shared), DatabasePath::parse(path)?)
    }

    pub fn credentials(&self) -> &Arc<CredentialContext> {
        &self.shared.context
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("url", &self.shared.root_url.as_str())
            .finish_non_exhaustive()
    }
}
