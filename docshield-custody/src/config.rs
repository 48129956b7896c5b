//! Key service client configuration.

use crate::error::{CustodyError, CustodyResult};
use serde::{Deserialize, Serialize};

/// Configuration for the key custody client.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KeyServiceConfig {
    /// Base URL for the key service (e.g., "https://keys.docshield.io").
    pub api_base_url: String,

    /// Tenant identifier sent with every request.
    pub tenant_id: String,

    /// Whole-request timeout in seconds.
    pub request_timeout_secs: u64,

    /// TCP/TLS connect timeout in seconds.
    pub connect_timeout_secs: u64,
}

impl Default for KeyServiceConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://keys.docshield.io".to_string(),
            tenant_id: "docshield".to_string(),
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

impl KeyServiceConfig {
    /// Checks the config before a client is built from it.
    pub fn validate(&self) -> CustodyResult<()> {
        let url = self.api_base_url.trim();
        if url.is_empty() {
            return Err(CustodyError::Config("missing api_base_url".to_string()));
        }
        if !(url.starts_with("https://") || url.starts_with("http://")) {
            return Err(CustodyError::Config(format!(
                "api_base_url must be an http(s) URL, got {url}"
            )));
        }
        if self.tenant_id.trim().is_empty() {
            return Err(CustodyError::Config("missing tenant_id".to_string()));
        }
        if self.request_timeout_secs == 0 || self.connect_timeout_secs == 0 {
            return Err(CustodyError::Config("timeouts must be non-zero".to_string()));
        }
        Ok(())
    }

    /// Base URL without a trailing slash.
    pub(crate) fn base_url(&self) -> &str {
        self.api_base_url.trim().trim_end_matches('/')
    }
}
