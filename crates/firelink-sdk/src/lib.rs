//! Firelink SDK
//!
//! High-level entry points for applications: [`FirebaseApp`] bundles the
//! credential context, authentication and database handles for one project,
//! and [`AppRegistry`] lets a host look apps up by project id.
//!
//! # Example
//!
//! ```no_run
//! use firelink_sdk::{AppRegistry, FirebaseConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = AppRegistry::new();
//! registry.initialize(FirebaseConfig::new("demo", "web-api-key"))?;
//!
//! let app = registry.get("demo")?;
//! let motd = app.database().reference("public/motd")?.read().await?;
//! println!("{:?}", motd);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod registry;

pub use client::FirebaseApp;
pub use registry::AppRegistry;

// Re-export commonly used types from core
pub use firelink_core::{
    AuthService, CredentialContext, Database, DatabasePath, FirebaseConfig, FirelinkError,
    FirelinkResult, HttpMethod, HttpRequest, HttpResponse, HttpTransport, Reference, SessionUser,
    TimeoutConfig, UnifiedError,
};
