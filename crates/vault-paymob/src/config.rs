//! # Paymob Configuration
//!
//! Configuration management for the Paymob integration.
//! The API key is loaded from the environment and never logged.

use std::fmt;
use std::time::Duration;
use vault_core::VaultError;

/// Production Paymob Accept host
pub const DEFAULT_API_BASE_URL: &str = "https://accept.paymob.com";

/// Paymob API configuration
#[derive(Clone)]
pub struct PaymobConfig {
    /// Secret API key, sent only in the auth-token call
    pub api_key: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,

    /// Per-request timeout. `None` leaves the HTTP client's default.
    pub timeout: Option<Duration>,
}

impl PaymobConfig {
    /// Build from any key lookup (environment, config file, test map).
    ///
    /// Required: `PAYMOB_API_KEY`.
    /// Optional: `PAYMOB_API_BASE_URL`, `PAYMOB_TIMEOUT_SECS`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, VaultError> {
        let api_key = lookup("PAYMOB_API_KEY")
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| VaultError::Configuration("PAYMOB_API_KEY not set".to_string()))?;

        let mut config = Self::new(api_key);

        if let Some(url) = lookup("PAYMOB_API_BASE_URL") {
            config = config.with_api_base_url(url);
        }

        if let Some(secs) = lookup("PAYMOB_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| {
                VaultError::Configuration(format!("PAYMOB_TIMEOUT_SECS is not a number: {}", secs))
            })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }

        Ok(config)
    }

    /// Create config with explicit values (for testing)
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: None,
        }
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Builder: set an explicit request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Auth token endpoint
    pub fn auth_tokens_url(&self) -> String {
        format!("{}/api/auth/tokens", self.api_base_url)
    }

    /// Card tokenization endpoint
    pub fn tokenization_url(&self) -> String {
        format!("{}/api/acceptance/tokenization", self.api_base_url)
    }
}

impl fmt::Debug for PaymobConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymobConfig")
            .field("api_key", &"[redacted]")
            .field("api_base_url", &self.api_base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}
