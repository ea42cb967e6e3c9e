//! YouTube client configuration

use serde::{Deserialize, Serialize};

/// What to do when a batch request carries more ids than the upstream allows
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BatchLimitPolicy {
    /// Fail before issuing the request
    #[default]
    Reject,

    /// Log a warning and send the batch unchanged
    Warn,
}

/// YouTube Data API client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct YouTubeConfig {
    api_key: Option<String>,
    base_url: String,
    timeout_seconds: u64,
    batch_limit_policy: BatchLimitPolicy,
}

impl Default for YouTubeConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: "https://www.googleapis.com/youtube/v3".to_string(),
            timeout_seconds: 30,
            batch_limit_policy: BatchLimitPolicy::Reject,
        }
    }
}

impl YouTubeConfig {
    /// Create new YouTube config
    pub fn new() -> Self {
        Self::default()
    }

    /// Get API key
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Set API key
    pub fn with_api_key(mut self, api_key: Option<String>) -> Self {
        self.api_key = api_key;
        self
    }

    /// Get base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set base URL
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Get timeout
    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout_seconds: u64) -> Self {
        self.timeout_seconds = timeout_seconds;
        self
    }

    /// Get batch limit policy
    pub fn batch_limit_policy(&self) -> BatchLimitPolicy {
        self.batch_limit_policy
    }

    /// Set batch limit policy
    pub fn with_batch_limit_policy(mut self, policy: BatchLimitPolicy) -> Self {
        self.batch_limit_policy = policy;
        self
    }
}
