//! Timeout configuration for the HTTP transport
//!
//! No retry is layered on top of these values; a request that times out is
//! reported once as an HTTP error.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default connection timeout (10 seconds)
pub const DEFAULT_CONNECT_SECS: u64 = 10;

/// Default whole-request timeout (30 seconds)
pub const DEFAULT_REQUEST_SECS: u64 = 30;

/// Connect and request timeouts applied to every outbound call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeoutConfig {
    /// Seconds allowed to establish a connection
    #[serde(default = "default_connect_secs")]
    pub connect_timeout_secs: u64,
    /// Seconds allowed for the full request/response exchange
    #[serde(default = "default_request_secs")]
    pub request_timeout_secs: u64,
}

fn default_connect_secs() -> u64 {
    DEFAULT_CONNECT_SECS
}

fn default_request_secs() -> u64 {
    DEFAULT_REQUEST_SECS
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: DEFAULT_CONNECT_SECS,
            request_timeout_secs: DEFAULT_REQUEST_SECS,
        }
    }
}

impl TimeoutConfig {
    /// Connection timeout as Duration
    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    /// Request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Both timeouts must be non-zero, and a request cannot finish before it connects
    pub fn validate(&self) -> Result<(), String> {
        if self.connect_timeout_secs == 0 {
            return Err("connect_timeout_secs must be greater than zero".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than zero".to_string());
        }
        if self.request_timeout_secs < self.connect_timeout_secs {
            return Err(format!(
                "request_timeout_secs ({}) is shorter than connect_timeout_secs ({})",
                self.request_timeout_secs, self.connect_timeout_secs
            ));
        }
        Ok(())
    }
}
