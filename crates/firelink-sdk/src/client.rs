//! Top-level Firebase client

use firelink_core::{
    AuthService, CredentialContext, Database, FirebaseConfig, FirelinkResult, HttpTransport,
    ReqwestTransport, SessionUser,
};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// One initialized Firebase project.
///
/// `FirebaseApp` owns the [`CredentialContext`] for the project and the HTTP
/// transport. The [`AuthService`] and [`Database`] handles it gives out share
/// both, so signing in through `auth()` authorizes every reference obtained
/// from `database()`, including ones created earlier.
///
/// # Examples
///
/// ```no_run
/// use firelink_sdk::{FirebaseApp, FirebaseConfig};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let app = FirebaseApp::new(FirebaseConfig::new("demo", "web-api-key"))?;
///
/// if app.auth().sign_in_with_password("ada@example.com", "hunter2").await? {
///     let scores = app.database().root().child("scores")?.child("ada")?;
///     scores.write(&json!({"best": 42})).await?;
/// }
/// # Ok(())
/// # }
/// ```
pub struct FirebaseApp {
    config: FirebaseConfig,
    credentials: Arc<CredentialContext>,
    auth: AuthService,
    database: Database,
}

impl FirebaseApp {
    /// Create an app talking to Firebase through `reqwest`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not validate or the
    /// HTTP client cannot be built.
    pub fn new(config: FirebaseConfig) -> FirelinkResult<Self> {
        config.validate()?;
        let transport = Arc::new(ReqwestTransport::new(&config.timeouts)?);
        Self::with_transport(config, transport)
    }

    /// Create an app over a caller-supplied transport
    pub fn with_transport(
        config: FirebaseConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> FirelinkResult<Self> {
        config.validate()?;
        let credentials = Arc::new(CredentialContext::from_config(&config)?);
        let auth = AuthService::from_config(
            Arc::clone(&credentials),
            Arc::clone(&transport),
            &config,
        );
        let database = Database::from_config(Arc::clone(&credentials), transport, &config)?;

        debug!(
            project_id = %config.project_id,
            database_url = %config.resolved_database_url(),
            "Initialized Firebase app"
        );

        Ok(Self {
            config,
            credentials,
            auth,
            database,
        })
    }

    /// Create an app from an optional config file plus `FIREBASE_*` variables
    pub fn from_sources(config_file: Option<&Path>) -> FirelinkResult<Self> {
        Self::new(firelink_core::load_config(config_file)?)
    }

    pub fn project_id(&self) -> &str {
        self.credentials.project_id()
    }

    pub fn config(&self) -> &FirebaseConfig {
        &self.config
    }

    /// The shared credential context
    pub fn credentials(&self) -> &Arc<CredentialContext> {
        &self.credentials
    }

    /// Authentication bound to this app's credentials
    pub fn auth(&self) -> &AuthService {
        &self.auth
    }

    /// Database handle bound to this app's credentials
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Shortcut for `credentials().current_user()`
    pub fn current_user(&self) -> Option<SessionUser> {
        self.credentials.current_user()
    }
}

impl std::fmt::Debug for FirebaseApp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FirebaseApp")
            .field("credentials", &self.credentials)
            .field("database", &self.database)
            .finish_non_exhaustive()
    }
}
