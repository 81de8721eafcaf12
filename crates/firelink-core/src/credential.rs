//! Shared credential context
//!
//! One `CredentialContext` exists per client. The auth service and every
//! database reference hold an `Arc` to it and read the current session at
//! call time. Each write replaces the whole session under a short lock; when
//! sign-in calls race, the last one to complete wins.

use crate::config::FirebaseConfig;
use crate::error::{FirelinkError, FirelinkResult};
use crate::session::SessionUser;
use parking_lot::RwLock;
use std::fmt;

pub struct CredentialContext {
    project_id: String,
    api_key: String,
    user: RwLock<Option<SessionUser>>,
}

impl CredentialContext {
    /// Create an unauthenticated context.
    ///
    /// Fails when either identifier is empty: nothing downstream could build a
    /// valid request from it.
    pub fn new(project_id: impl Into<String>, api_key: impl Into<String>) -> FirelinkResult<Self> {
        let project_id = project_id.into();
        let api_key = api_key.into();

        if project_id.trim().is_empty() {
            return Err(FirelinkError::config_with_context(
                "project id cannot be empty",
                "Creating credential context",
            ));
        }
        if api_key.trim().is_empty() {
            return Err(FirelinkError::config_with_context(
                "API key cannot be empty",
                "Creating credential context",
            ));
        }

        Ok(Self {
            project_id,
            api_key,
            user: RwLock::new(None),
        })
    }

    /// Create a context from an already validated config
    pub fn from_config(config: &FirebaseConfig) -> FirelinkResult<Self> {
        Self::new(config.project_id.clone(), config.api_key.clone())
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Snapshot of the current session, `None` when signed out
    pub fn current_user(&self) -> Option<SessionUser> {
        self.user.read().clone()
    }

    /// The bearer token to attach to the next request, if any
    pub fn id_token(&self) -> Option<String> {
        self.user
            .read()
            .as_ref()
            .and_then(|user| user.bearer_token())
            .map(str::to_string)
    }

    pub fn is_signed_in(&self) -> bool {
        self.user.read().is_some()
    }

    /// Replace the session wholesale
    pub fn set_user(&self, user: Option<SessionUser>) {
        *self.user.write() = user;
    }

    pub fn replace_user(&self, user: SessionUser) {
        self.set_user(Some(user));
    }

    pub fn clear_user(&self) {
        self.set_user(None);
    }
}

impl fmt::Debug for CredentialContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialContext")
            .field("project_id", &self.project_id)
            .field("signed_in", &self.is_signed_in())
            .finish_non_exhaustive()
    }
}
