//! Configuration module for mailgate.

use serde::Deserialize;
use std::path::Path;

use crate::{MailGateError, Result};

/// Web API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WebConfig {
    /// Host address to bind.
    #[serde(default = "default_web_host")]
    pub host: String,
    /// Port number for the Web API.
    #[serde(default = "default_web_port")]
    pub port: u16,
    /// CORS allowed origins.
    #[serde(default)]
    pub cors_origins: Vec<String>,
    /// Upper bound on a single request, including any sync it triggers.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Rate limit for the public credential endpoints (requests per minute per IP).
    #[serde(default = "default_public_rate_limit")]
    pub public_rate_limit: u32,
    /// Key rate limits on `X-Forwarded-For`/`X-Real-IP` instead of the peer
    /// address. Only enable behind a reverse proxy that overwrites them.
    #[serde(default)]
    pub trust_forwarded_headers: bool,
}

fn default_web_host() -> String {
    "0.0.0.0".to_string()
}

fn default_web_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

fn default_public_rate_limit() -> u32 {
    30
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
            cors_origins: vec![],
            request_timeout_secs: default_request_timeout(),
            public_rate_limit: default_public_rate_limit(),
            trust_forwarded_headers: false,
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/mailgate.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Listing query configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct QueryConfig {
    /// Page size used when the caller omits one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
    /// Largest page size a caller may request.
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

fn default_page_size() -> u32 {
    20
}

fn default_max_page_size() -> u32 {
    100
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

/// Secret hashing configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Argon2 memory cost in KiB.
    #[serde(default = "default_argon2_memory")]
    pub argon2_memory_kib: u32,
    /// Argon2 time cost (iterations).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,
    /// Argon2 parallelism (lanes).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

fn default_argon2_memory() -> u32 {
    65536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            argon2_memory_kib: default_argon2_memory(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

/// Mailbox synchronization configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Whether sync-then-list calls out to a sync service.
    #[serde(default)]
    pub enabled: bool,
    /// Base URL of the sync service.
    #[serde(default)]
    pub endpoint: String,
    /// Timeout for a single sync call in seconds.
    #[serde(default = "default_sync_timeout")]
    pub timeout_secs: u64,
}

fn default_sync_timeout() -> u64 {
    60
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: String::new(),
            timeout_secs: default_sync_timeout(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/mailgate.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// Web API configuration.
    #[serde(default)]
    pub web: WebConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Listing query configuration.
    #[serde(default)]
    pub query: QueryConfig,
    /// Secret hashing configuration.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Mailbox synchronization configuration.
    #[serde(default)]
    pub sync: SyncConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(MailGateError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| MailGateError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `MAILGATE_DATABASE_PATH`: Override the database path
    /// - `MAILGATE_SYNC_ENDPOINT`: Override the sync service endpoint
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("MAILGATE_DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
        if let Ok(endpoint) = std::env::var("MAILGATE_SYNC_ENDPOINT") {
            if !endpoint.is_empty() {
                self.sync.endpoint = endpoint;
            }
        }
    }

    /// Validate the configuration.
    ///
    /// Returns an error if:
    /// - sync is enabled without an http(s) endpoint
    /// - `max_page_size` is zero or smaller than `default_page_size`
    pub fn validate(&self) -> Result<()> {
        if self.sync.enabled {
            let url = url::Url::parse(&self.sync.endpoint).map_err(|e| {
                MailGateError::Config(format!(
                    "sync is enabled but endpoint {:?} is not a valid URL: {e}",
                    self.sync.endpoint
                ))
            })?;
            if url.scheme() != "http" && url.scheme() != "https" {
                return Err(MailGateError::Config(format!(
                    "sync endpoint must use http or https, got {}",
                    url.scheme()
                )));
            }
        }

        if self.query.max_page_size == 0 {
            return Err(MailGateError::Config(
                "query.max_page_size must be at least 1".to_string(),
            ));
        }
        if self.query.default_page_size == 0
            || self.query.default_page_size > self.query.max_page_size
        {
            return Err(MailGateError::Config(format!(
                "query.default_page_size must be between 1 and {}",
                self.query.max_page_size
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.web.host, "0.0.0.0");
        assert_eq!(config.web.port, 8080);
        assert!(config.web.cors_origins.is_empty());
        assert_eq!(config.web.request_timeout_secs, 30);
        assert_eq!(config.web.public_rate_limit, 30);
        assert!(!config.web.trust_forwarded_headers);

        assert_eq!(config.database.path, "data/mailgate.db");

        assert_eq!(config.query.default_page_size, 20);
        assert_eq!(config.query.max_page_size, 100);

        assert_eq!(config.auth.argon2_memory_kib, 65536);
        assert_eq!(config.auth.argon2_iterations, 3);
        assert_eq!(config.auth.argon2_parallelism, 4);

        assert!(!config.sync.enabled);
        assert!(config.sync.endpoint.is_empty());
        assert_eq!(config.sync.timeout_secs, 60);

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.file, "logs/mailgate.log");
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
[web]
host = "127.0.0.1"
port = 3000
cors_origins = ["http://localhost:3000"]
request_timeout_secs = 10
public_rate_limit = 60
trust_forwarded_headers = true

[database]
path = "custom/mail.db"

[query]
default_page_size = 50
max_page_size = 200

[auth]
argon2_memory_kib = 19456
argon2_iterations = 2
argon2_parallelism = 1

[sync]
enabled = true
endpoint = "http://sync.internal:9000"
timeout_secs = 15

[logging]
level = "debug"
file = "custom/logs/app.log"
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.web.host, "127.0.0.1");
        assert_eq!(config.web.port, 3000);
        assert_eq!(config.web.cors_origins, vec!["http://localhost:3000"]);
        assert_eq!(config.web.request_timeout_secs, 10);
        assert_eq!(config.web.public_rate_limit, 60);
        assert!(config.web.trust_forwarded_headers);
        assert_eq!(config.database.path, "custom/mail.db");
        assert_eq!(config.query.default_page_size, 50);
        assert_eq!(config.query.max_page_size, 200);
        assert_eq!(config.auth.argon2_memory_kib, 19456);
        assert_eq!(config.auth.argon2_iterations, 2);
        assert_eq!(config.auth.argon2_parallelism, 1);
        assert!(config.sync.enabled);
        assert_eq!(config.sync.endpoint, "http://sync.internal:9000");
        assert_eq!(config.sync.timeout_secs, 15);
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.file, "custom/logs/app.log");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_config() {
        let toml = r#"
[web]
port = 9090
"#;

        let config = Config::parse(toml).unwrap();

        assert_eq!(config.web.port, 9090);
        assert_eq!(config.web.host, "0.0.0.0");
        assert_eq!(config.query.default_page_size, 20);
        assert_eq!(config.database.path, "data/mailgate.db");
    }

    #[test]
    fn test_parse_empty_config() {
        let config = Config::parse("").unwrap();
        assert_eq!(config.web.port, 8080);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_invalid_config() {
        let result = Config::parse("this is not valid toml [[[");

        if let Err(MailGateError::Config(msg)) = result {
            assert!(msg.contains("config parse error"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_load_nonexistent_file() {
        let result = Config::load("nonexistent.toml");
        assert!(matches!(result, Err(MailGateError::Io(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[database]\npath = \"from/file.db\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.database.path, "from/file.db");
    }

    #[test]
    fn test_apply_env_overrides_sync_endpoint() {
        let original = std::env::var("MAILGATE_SYNC_ENDPOINT").ok();

        std::env::set_var("MAILGATE_SYNC_ENDPOINT", "https://sync.example.com");
        let mut config = Config::default();
        config.apply_env_overrides();
        assert_eq!(config.sync.endpoint, "https://sync.example.com");

        std::env::set_var("MAILGATE_SYNC_ENDPOINT", "");
        let mut config = Config::default();
        config.sync.endpoint = "http://kept".to_string();
        config.apply_env_overrides();
        assert_eq!(config.sync.endpoint, "http://kept");

        if let Some(val) = original {
            std::env::set_var("MAILGATE_SYNC_ENDPOINT", val);
        } else {
            std::env::remove_var("MAILGATE_SYNC_ENDPOINT");
        }
    }

    #[test]
    fn test_validate_sync_enabled_without_endpoint() {
        let mut config = Config::default();
        config.sync.enabled = true;

        let result = config.validate();
        assert!(matches!(result, Err(MailGateError::Config(_))));
    }

    #[test]
    fn test_validate_sync_endpoint_scheme() {
        let mut config = Config::default();
        config.sync.enabled = true;
        config.sync.endpoint = "ftp://sync.example.com".to_string();

        let result = config.validate();
        if let Err(MailGateError::Config(msg)) = result {
            assert!(msg.contains("http or https"));
        } else {
            panic!("Expected Config error");
        }
    }

    #[test]
    fn test_validate_sync_disabled_ignores_endpoint() {
        let mut config = Config::default();
        config.sync.endpoint = "not a url".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_page_sizes() {
        let mut config = Config::default();
        config.query.max_page_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.query.default_page_size = 500;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.query.default_page_size = 0;
        assert!(config.validate().is_err());
    }
}
