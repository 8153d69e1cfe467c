//! Client configuration.
//!
//! The remote endpoint address and HTTP timeouts live here; everything else
//! (image preparation parameters, display concerns) belongs to the callers.

use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_BASE_URL: &str = "https://jumboappetit.larrys.tech/api";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Connection settings shared by all API clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the API, without a trailing slash
    pub base_url: String,
    /// Timeout for plain request/response calls. Streaming requests only
    /// apply the connect timeout, since a scan stream stays open for as
    /// long as the analysis runs.
    pub request_timeout_secs: u64,
    /// Timeout for establishing a connection
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }
}

impl ClientConfig {
    /// Loads configuration from environment variables, falling back to the
    /// defaults for anything unset.
    ///
    /// Recognized variables: `APPETIT_BASE_URL`, `APPETIT_TIMEOUT_SECS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(base_url) = env::var("APPETIT_BASE_URL") {
            config = config.with_base_url(base_url);
        }

        if let Ok(timeout) = env::var("APPETIT_TIMEOUT_SECS")
            && let Ok(secs) = timeout.parse::<u64>()
        {
            config.request_timeout_secs = secs;
        }

        config
    }

    /// Overrides the base URL, normalizing away a trailing slash.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }
}
