//! Email/password authentication
//!
//! Provides:
//! - Account sign-up
//! - Password and refresh-token sign-in
//! - Password reset emails
//! - Local sign-out

mod requests;
mod service;

pub use service::AuthService;
