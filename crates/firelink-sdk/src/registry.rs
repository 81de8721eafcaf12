//! Explicit registry of initialized apps, keyed by project id
//!
//! There is no process-wide instance: the host creates an `AppRegistry`,
//! keeps it for as long as it needs lookups by name, and drops it on
//! teardown.

use crate::client::FirebaseApp;
use firelink_core::{FirebaseConfig, FirelinkError, FirelinkResult, HttpTransport};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

#[derive(Default)]
pub struct AppRegistry {
    apps: RwLock<HashMap<String, Arc<FirebaseApp>>>,
}

impl AppRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register an app for `config.project_id`.
    ///
    /// Fails if an app for that project is already registered.
    pub fn initialize(&self, config: FirebaseConfig) -> FirelinkResult<Arc<FirebaseApp>> {
        self.ensure_vacant(&config.project_id)?;
        let app = FirebaseApp::new(config)?;
        self.insert(app)
    }

    /// Like [`AppRegistry::initialize`] with a caller-supplied transport
    pub fn initialize_with_transport(
        &self,
        config: FirebaseConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> FirelinkResult<Arc<FirebaseApp>> {
        self.ensure_vacant(&config.project_id)?;
        let app = FirebaseApp::with_transport(config, transport)?;
        self.insert(app)
    }

    /// Register an app that was built elsewhere
    pub fn insert(&self, app: FirebaseApp) -> FirelinkResult<Arc<FirebaseApp>> {
        let project_id = app.project_id().to_string();
        let mut apps = self.apps.write();
        if apps.contains_key(&project_id) {
            return Err(already_initialized(&project_id));
        }
        let app = Arc::new(app);
        apps.insert(project_id.clone(), Arc::clone(&app));
        debug!(%project_id, "Registered Firebase app");
        Ok(app)
    }

    /// Look up a previously initialized app
    pub fn get(&self, project_id: &str) -> FirelinkResult<Arc<FirebaseApp>> {
        self.apps.read().get(project_id).cloned().ok_or_else(|| {
            FirelinkError::not_found_resource(
                format!("no Firebase app initialized for project '{}'", project_id),
                "firebase_app",
            )
        })
    }

    /// Unregister an app. Handles already given out stay usable.
    pub fn remove(&self, project_id: &str) -> Option<Arc<FirebaseApp>> {
        let removed = self.apps.write().remove(project_id);
        if removed.is_some() {
            debug!(%project_id, "Removed Firebase app");
        }
        removed
    }

    pub fn contains(&self, project_id: &str) -> bool {
        self.apps.read().contains_key(project_id)
    }

    pub fn project_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.apps.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.apps.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.apps.read().is_empty()
    }

    fn ensure_vacant(&self, project_id: &str) -> FirelinkResult<()> {
        if self.contains(project_id) {
            return Err(already_initialized(project_id));
        }
        Ok(())
    }
}

fn already_initialized(project_id: &str) -> FirelinkError {
    FirelinkError::config_with_context(
        format!("a Firebase app for project '{}' is already initialized", project_id),
        "remove the existing app before initializing it again",
    )
}
