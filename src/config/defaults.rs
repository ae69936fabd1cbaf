/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
// Service defaults
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api/metadata";
pub const DEFAULT_REQUEST_TIMEOUT: &str = "2m";
// Used when the service does not report a language
pub const DEFAULT_FALLBACK_LOCALE: u32 = 1033;

// Import defaults
pub const DEFAULT_PUBLISH: bool = true;

// Logging defaults
pub const DEFAULT_LOG_LEVEL: &str = "info";

// Config file
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "SCHEMA_PROVISIONER_";
