use std::time::Duration;

use crate::shared::config::{AppConfig, AppConfigBuilder, ConfigError};

/// Default server URL
const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:8080";

/// Client configuration: where the API is, plus the bearer token once logged in.
#[derive(Debug, Clone)]
pub struct Config {
    app: AppConfig,
    token: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let app = AppConfig {
            server_url: Some(DEFAULT_SERVER_URL.to_string()),
            ..AppConfig::default()
        };
        Self { app, token: None }
    }
}

impl Config {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Read `CONSOLE_API_URL`, `CONSOLE_COLLECTION_PATH` and
    /// `CONSOLE_TIMEOUT_SECS`, falling back to defaults for unset keys.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = AppConfig::builder().server_url(
            std::env::var("CONSOLE_API_URL").unwrap_or_else(|_| DEFAULT_SERVER_URL.to_string()),
        );
        if let Ok(path) = std::env::var("CONSOLE_COLLECTION_PATH") {
            builder = builder.collection_path(path);
        }
        if let Ok(secs) = std::env::var("CONSOLE_TIMEOUT_SECS") {
            let secs = secs.trim().parse::<u64>().map_err(|_| ConfigError::InvalidValue {
                key: "CONSOLE_TIMEOUT_SECS",
                value: secs.clone(),
            })?;
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Self::with_builder(builder)
    }

    pub fn with_builder(builder: AppConfigBuilder) -> Result<Self, ConfigError> {
        let app = builder.build()?;
        Ok(Self { app, token: None })
    }

    /// Set the bearer token
    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    /// Get the bearer token
    pub fn get_token(&self) -> Option<&String> {
        self.token.as_ref()
    }

    /// Clear the token (logout)
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    /// Get the full URL for an API endpoint
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.server_url(), path)
    }

    /// Full URL of the software collection
    pub fn collection_url(&self) -> String {
        self.api_url(&self.app.collection_path)
    }

    pub fn server_url(&self) -> &str {
        self.app.server_url.as_deref().unwrap_or(DEFAULT_SERVER_URL)
    }

    pub fn timeout(&self) -> Duration {
        self.app.timeout
    }
}
