//! Outbound HTTP configuration.

use serde::{Deserialize, Serialize};

/// Settings for the HTTP client exposed to plugin scripts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    /// User-Agent header sent when a script does not supply one.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("{}/{}", crate::APP_NAME, crate::APP_VERSION)
}
