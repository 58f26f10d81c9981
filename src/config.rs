//! Client Configuration
//! Mission: Environment-driven configuration with sane defaults

use std::path::PathBuf;

/// Configuration for the session client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Identity service base URL, no trailing slash.
    pub base_url: String,
    /// Durable token file location.
    pub token_path: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            token_path: PathBuf::from(".konnect_tokens.json"),
        }
    }
}

impl ClientConfig {
    /// Load from environment with defaults.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = std::env::var("KONNECT_API_BASE") {
            config.base_url = v.trim_end_matches('/').to_string();
        }
        if let Ok(v) = std::env::var("KONNECT_TOKEN_PATH") {
            config.token_path = PathBuf::from(v);
        }

        config
    }
}
