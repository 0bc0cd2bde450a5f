//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub service: ServiceConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the diary application is served
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    #[serde(default = "default_service_url")]
    pub url: String,

    #[serde(default)]
    pub chain_id: String,

    #[serde(default)]
    pub application_id: String,
}

fn default_service_url() -> String {
    "http://localhost:8080".to_string()
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            url: default_service_url(),
            chain_id: String::new(),
            application_id: String::new(),
        }
    }
}

impl ServiceConfig {
    /// `{url}/chains/{chain_id}/applications/{application_id}`
    pub fn graphql_url(&self) -> Result<String, ConfigError> {
        let base = self.url.trim().trim_end_matches('/');
        if base.is_empty() {
            return Err(ConfigError::Missing("service.url"));
        }
        if self.chain_id.trim().is_empty() {
            return Err(ConfigError::Missing("service.chain_id"));
        }
        if self.application_id.trim().is_empty() {
            return Err(ConfigError::Missing("service.application_id"));
        }

        Ok(format!(
            "{}/chains/{}/applications/{}",
            base,
            urlencoding::encode(self.chain_id.trim()),
            urlencoding::encode(self.application_id.trim())
        ))
    }
}

/// Local persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_data_dir() -> String {
    dirs::data_local_dir()
        .map(|p| p.join("diary").to_string_lossy().to_string())
        .unwrap_or_else(|| "./diary_data".to_string())
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl StorageConfig {
    /// Tab-session store (unlock flag)
    pub fn session_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join("session.json")
    }

    /// Durable preference store (theme)
    pub fn preferences_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join("preferences.json")
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
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

        Self::parse(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })
    }

    fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
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
            dirs::config_dir().map(|p| p.join("diary").join("config.toml")),
            Some(PathBuf::from("./diary.toml")),
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
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("DIARY_SERVICE_URL") {
            self.service.url = url;
        }
        if let Some(chain_id) = lookup("DIARY_CHAIN_ID") {
            self.service.chain_id = chain_id;
        }
        if let Some(application_id) = lookup("DIARY_APPLICATION_ID") {
            self.service.application_id = application_id;
        }

        if let Some(data_dir) = lookup("DIARY_DATA_DIR") {
            self.storage.data_dir = data_dir;
        }

        if let Some(level) = lookup("DIARY_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = lookup("DIARY_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },

    #[error("Missing required setting: {0}")]
    Missing(&'static str),
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# Diary Configuration
#
# Environment variables override these settings:
# - DIARY_SERVICE_URL
# - DIARY_CHAIN_ID
# - DIARY_APPLICATION_ID
# - DIARY_DATA_DIR
# - DIARY_LOG_LEVEL
# - DIARY_LOG_FORMAT

[service]
# Linera node service
url = "http://localhost:8080"

# Chain the diary application runs on
chain_id = ""

# Diary application id (printed on deployment)
application_id = ""

[storage]
# Where the unlock flag and preferences are kept
data_dir = "~/.local/share/diary"

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
