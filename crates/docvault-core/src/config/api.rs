//! Document-storage API client configuration.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Settings for the HTTP document-storage API.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ApiConfig {
    /// Base URL of the API, e.g. `https://backoffice.example.com/api`.
    #[serde(default = "default_base_url")]
    #[validate(length(min = 1))]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    #[validate(range(min = 1, max = 600))]
    pub timeout_seconds: u64,
    /// Bearer token forwarded verbatim in the `Authorization` header.
    #[serde(default)]
    pub bearer_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            bearer_token: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

fn default_timeout() -> u64 {
    30
}
