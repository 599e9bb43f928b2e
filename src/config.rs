//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api;
use crate::storage;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: String,

    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    #[serde(default = "default_connection_timeout")]
    pub connection_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

fn default_db_path() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("lifeboard").join("lifeboard.db").to_string_lossy().to_string())
        .unwrap_or_else(|| "./lifeboard.db".to_string())
}

fn default_pool_size() -> u32 {
    8
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_idle_timeout() -> u64 {
    280 // recycle idle connections before five minutes
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            pool_size: default_pool_size(),
            connection_timeout_secs: default_connection_timeout(),
            idle_timeout_secs: default_idle_timeout(),
        }
    }
}

impl DatabaseConfig {
    /// Pool settings for the storage layer
    pub fn to_storage(&self) -> storage::DatabaseConfig {
        storage::DatabaseConfig {
            pool_size: self.pool_size.max(1),
            connection_timeout: Duration::from_secs(self.connection_timeout_secs),
            idle_timeout: Duration::from_secs(self.idle_timeout_secs),
            ..storage::DatabaseConfig::new(expand_home(&self.path))
        }
    }
}

/// API server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Runtime settings for the HTTP server
    pub fn to_api(&self) -> api::ApiConfig {
        api::ApiConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Self::parse(&content).map_err(|error| ConfigError::Parse {
            path: path.to_path_buf(),
            error,
        })
    }

    fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths = [
            dirs::config_dir().map(|p| p.join("lifeboard").join("config.toml")),
            Some(PathBuf::from("./config.toml")),
        ];

        for path in config_paths.iter().flatten() {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        tracing::info!("Using default config with environment overrides");
        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("LIFEBOARD_DB_PATH") {
            self.database.path = path;
        }

        if let Ok(host) = std::env::var("LIFEBOARD_API_HOST") {
            self.api.host = host;
        }
        if let Ok(port) = std::env::var("LIFEBOARD_API_PORT") {
            match port.parse() {
                Ok(p) => self.api.port = p,
                Err(_) => tracing::warn!("Ignoring invalid LIFEBOARD_API_PORT: {}", port),
            }
        }

        if let Ok(level) = std::env::var("LIFEBOARD_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("LIFEBOARD_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Lifeboard Configuration
#
# Environment variables override these settings:
# - LIFEBOARD_DB_PATH
# - LIFEBOARD_API_HOST
# - LIFEBOARD_API_PORT
# - LIFEBOARD_LOG_LEVEL
# - LIFEBOARD_LOG_FORMAT

[database]
# SQLite database file
path = "~/.local/share/lifeboard/lifeboard.db"

# Maximum pooled connections
pool_size = 8

# How long to wait for a free connection (seconds)
connection_timeout_secs = 30

# Close connections idle for longer than this (seconds)
idle_timeout_secs = 280

[api]
# API server host
host = "127.0.0.1"

# API server port
port = 5000

# Allowed CORS origins; leave empty to allow any origin
cors_origins = []

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_config_parses() {
        let config = Config::parse(&generate_default_config()).unwrap();
        assert_eq!(config.api.port, 5000);
        assert_eq!(config.database.pool_size, 8);
        assert_eq!(config.logging.format, "pretty");
        assert!(config.api.cors_origins.is_empty());
    }

    #[test]
    fn test_missing_sections_use_defaults() {
        let config = Config::parse("[api]\nport = 9000\n").unwrap();
        assert_eq!(config.api.port, 9000);
        assert_eq!(config.api.host, "127.0.0.1");
        assert_eq!(config.database.idle_timeout_secs, 280);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_invalid_toml() {
        assert!(Config::parse("[api\nport = ").is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_storage_conversion() {
        let config = DatabaseConfig {
            path: "/tmp/lifeboard-test.db".to_string(),
            pool_size: 0,
            connection_timeout_secs: 5,
            idle_timeout_secs: 60,
        };
        let storage = config.to_storage();
        assert_eq!(storage.path, PathBuf::from("/tmp/lifeboard-test.db"));
        assert_eq!(storage.pool_size, 1);
        assert_eq!(storage.idle_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_expand_home() {
        assert_eq!(expand_home("/var/db.sqlite"), PathBuf::from("/var/db.sqlite"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_home("~/x.db"), home.join("x.db"));
        }
    }
}
