use anyhow::Result;
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod defaults;
pub mod duration_serde;

use defaults::*;

/// Connection settings for the remote metadata service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// Base URL of the metadata API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Timeout applied to every call
    #[serde(default = "default_request_timeout", with = "duration_serde::duration")]
    pub request_timeout: Duration,
    /// Bearer token sent with every call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    /// Language code used when the service does not report one
    #[serde(default = "default_fallback_locale")]
    pub fallback_locale: u32,
}

/// Pipeline behaviour
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Publish customizations after a run with at least one success
    #[serde(default = "default_publish")]
    pub publish: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,
    #[serde(default)]
    pub import: ImportConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout() -> Duration {
    humantime::parse_duration(DEFAULT_REQUEST_TIMEOUT).unwrap_or(Duration::from_secs(120))
}

fn default_fallback_locale() -> u32 {
    DEFAULT_FALLBACK_LOCALE
}

fn default_publish() -> bool {
    DEFAULT_PUBLISH
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout: default_request_timeout(),
            access_token: None,
            fallback_locale: default_fallback_locale(),
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            publish: default_publish(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_file =
            std::env::var("SCHEMA_PROVISIONER_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Self::load_from_file(&config_file)
    }

    /// Load `config_file`, writing a default one first if it does not exist.
    ///
    /// Environment variables such as `SCHEMA_PROVISIONER_SERVICE__BASE_URL`
    /// override file values.
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        if !Path::new(config_file).exists() {
            let contents = toml::to_string_pretty(&Self::default())?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
        }

        let config: Self = Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.service.base_url.trim().is_empty() {
            return Err("service.base_url must not be empty".to_string());
        }
        if !self.service.base_url.starts_with("http://") && !self.service.base_url.starts_with("https://") {
            return Err(format!(
                "service.base_url must be an http(s) URL, got '{}'",
                self.service.base_url
            ));
        }
        if self.service.request_timeout.is_zero() {
            return Err("service.request_timeout must be greater than zero".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_is_created_with_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let path = path.to_str().unwrap();

        let config = Config::load_from_file(path).unwrap();

        assert!(Path::new(path).exists());
        assert_eq!(config.service.fallback_locale, 1033);
        assert_eq!(config.service.request_timeout, Duration::from_secs(120));
        assert!(config.import.publish);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[service]
base_url = "https://crm.example.com/api"
request_timeout = "30s"
fallback_locale = 1031

[import]
publish = false
"#,
        )
        .unwrap();

        let config = Config::load_from_file(path.to_str().unwrap()).unwrap();

        assert_eq!(config.service.base_url, "https://crm.example.com/api");
        assert_eq!(config.service.request_timeout, Duration::from_secs(30));
        assert_eq!(config.service.fallback_locale, 1031);
        assert!(!config.import.publish);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn validation_rejects_unusable_service_settings() {
        let mut config = Config::default();
        config.service.base_url = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.service.request_timeout = Duration::ZERO;
        assert!(config.validate().is_err());
    }
}
