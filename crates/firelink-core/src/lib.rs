//! Firelink Core Library
//!
//! Email/password authentication against Firebase and CRUD access to the
//! Realtime Database over its REST API. A single [`CredentialContext`] is
//! shared by the [`AuthService`] and every database [`Reference`]; signing in
//! mutates the context and subsequent database calls pick up the new token.

// Allow common clippy lints that are stylistic preferences
#![allow(clippy::collapsible_if)]

pub mod auth;
pub mod config;
pub mod credential;
pub mod database;
pub mod error;
pub mod session;
pub mod transport;

// Re-export commonly used types
pub use auth::AuthService;
pub use config::{FirebaseConfig, TimeoutConfig, load_config};
pub use credential::CredentialContext;
pub use database::{Database, DatabasePath, Reference};
pub use error::{FirelinkError, FirelinkResult, UnifiedError};
pub use session::SessionUser;
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
