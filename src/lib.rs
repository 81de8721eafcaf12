//! Firelink: Firebase Auth and Realtime Database over plain HTTPS.
//!
//! This crate re-exports [`firelink_sdk`]; see [`FirebaseApp`] for the entry
//! point and [`AppRegistry`] for hosts that juggle several projects.

pub use firelink_sdk::*;

/// Lower-level building blocks (transport seam, raw requests, config loaders)
pub use firelink_core;
