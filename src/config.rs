use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

use crate::error::{PostmarkError, Result};

/// Server token accepted by the provider's sandbox; messages are validated but never delivered
pub const TEST_SERVER_TOKEN: &str = "POSTMARK_API_TEST";

/// Environment variable holding the server token
pub const TOKEN_ENV_VAR: &str = "POSTMARK_SERVER_TOKEN";

/// Environment variable overriding the API base URL
pub const BASE_URL_ENV_VAR: &str = "POSTMARK_API_BASE_URL";

/// Client settings
///
/// Only the server token is required; it is sent verbatim on every request.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientConfig {
    pub server_token: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("server_token", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

fn default_api_base_url() -> String {
    "https://api.postmarkapp.com".to_string()
}

fn default_user_agent() -> String {
    format!("postmark-rust/{}", env!("CARGO_PKG_VERSION"))
}

impl ClientConfig {
    pub fn new(server_token: impl Into<String>) -> Self {
        Self {
            server_token: server_token.into(),
            api_base_url: default_api_base_url(),
            user_agent: default_user_agent(),
        }
    }

    /// Point the client at a different API host (sandbox, mock server)
    pub fn with_base_url(mut self, api_base_url: impl Into<String>) -> Self {
        self.api_base_url = api_base_url.into();
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Load configuration from environment variables
    ///
    /// # Environment Variables
    /// - `POSTMARK_SERVER_TOKEN`: server token (required)
    /// - `POSTMARK_API_BASE_URL`: API base URL (optional)
    pub fn from_env() -> Result<Self> {
        let server_token = std::env::var(TOKEN_ENV_VAR)
            .map_err(|_| PostmarkError::Config(format!("{} not set", TOKEN_ENV_VAR)))?;

        let mut config = Self::new(server_token);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV_VAR) {
            config.api_base_url = base_url;
        }

        config.validate()?;
        Ok(config)
    }

    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PostmarkError::Config(format!(
                "Config file not found at {:?}",
                path
            )));
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| PostmarkError::Config(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| PostmarkError::Config(format!("Failed to parse config file: {}", e)))?;

        config.validate()?;

        tracing::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                PostmarkError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| PostmarkError::Config(format!("Failed to serialize config: {}", e)))?;

        tokio::fs::write(path, content)
            .await
            .map_err(|e| PostmarkError::Config(format!("Failed to write config file: {}", e)))?;

        tracing::info!("Saved configuration to {:?}", path);
        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.server_token.trim().is_empty() {
            return Err(PostmarkError::Config(
                "server_token cannot be empty".to_string(),
            ));
        }

        if !(self.api_base_url.starts_with("https://") || self.api_base_url.starts_with("http://"))
        {
            return Err(PostmarkError::Config(format!(
                "api_base_url must start with http:// or https://, got '{}'",
                self.api_base_url
            )));
        }

        if self.user_agent.trim().is_empty() {
            return Err(PostmarkError::Config(
                "user_agent cannot be empty".to_string(),
            ));
        }

        tracing::debug!("Configuration validation passed");
        Ok(())
    }

    /// Create an example configuration file using the sandbox token
    pub async fn create_example(path: &Path) -> Result<()> {
        Self::new(TEST_SERVER_TOKEN).save(path).await
    }
}
