#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::http::{resolve_api_base, DEFAULT_TIMEOUT};
use crate::app::flags::DEFAULT_POLL_INTERVAL;
use crate::core::{ConfigProvider, DEFAULT_MIN_DURATION};
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, Command};
pub use toml_config::TomlConfig;

/// Fully resolved client settings.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub request_timeout: Duration,
    pub min_loading_duration: Duration,
    pub flags_poll_interval: Duration,
    pub token_path: Option<PathBuf>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        let deployment = std::env::var("API_DEPLOYMENT").ok();
        Self {
            api_base_url: resolve_api_base(deployment.as_deref()).to_string(),
            request_timeout: DEFAULT_TIMEOUT,
            min_loading_duration: DEFAULT_MIN_DURATION,
            flags_poll_interval: DEFAULT_POLL_INTERVAL,
            token_path: default_token_path(),
        }
    }
}

/// `~/.openhack/token.json`, when a home directory is known.
pub fn default_token_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .or_else(|| std::env::var_os("USERPROFILE"))
        .map(|home| PathBuf::from(home).join(".openhack").join("token.json"))
}

impl ConfigProvider for ClientConfig {
    fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    fn min_loading_duration(&self) -> Duration {
        self.min_loading_duration
    }

    fn flags_poll_interval(&self) -> Duration {
        self.flags_poll_interval
    }

    fn token_path(&self) -> Option<&Path> {
        self.token_path.as_deref()
    }
}

impl Validate for ClientConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("api.base_url", &self.api_base_url)?;
        validation::validate_positive_duration("api.timeout_seconds", self.request_timeout)?;
        validation::validate_positive_duration("flags.poll_interval_ms", self.flags_poll_interval)?;
        if let Some(path) = &self.token_path {
            validation::validate_path("auth.token_path", &path.to_string_lossy())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = ClientConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_loading_duration(), Duration::from_millis(1000));
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_rejects_unsupported_scheme() {
        let config = ClientConfig {
            api_base_url: "ftp://openhack.ro".to_string(),
            ..ClientConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
