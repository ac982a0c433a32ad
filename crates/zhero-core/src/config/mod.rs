//! Configuration management for Zhero.
//!
//! Configuration is loaded from multiple sources with the following priority:
//! 1. Environment variables (highest priority)
//! 2. Project-local `zhero.toml` file
//! 3. User config `~/.config/zhero/config.toml`
//! 4. Built-in defaults (lowest priority)

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

mod defaults;

pub use defaults::*;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Vocabulary graph source and cache.
    pub vocab: VocabConfig,

    /// Admin server configuration.
    pub admin: ServerConfig,

    /// Public server configuration.
    pub public: PublicServerConfig,

    /// Storage configuration.
    pub storage: StorageConfig,

    /// Logging configuration.
    pub log: LogConfig,
}

impl Config {
    /// Load configuration from default locations.
    ///
    /// Searches for config in order:
    /// 1. `./zhero.toml` (project local)
    /// 2. `~/.config/zhero/config.toml` (user config)
    /// 3. Falls back to defaults
    ///
    /// Environment overrides are applied in every case.
    pub fn load() -> Result<Self, ConfigError> {
        if Path::new(PROJECT_CONFIG_FILE).exists() {
            return Self::from_file(PROJECT_CONFIG_FILE);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join(USER_CONFIG_DIR).join(USER_CONFIG_FILE);
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = toml::from_str(&content)?;

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(file) = std::env::var("ZHERO_VOCAB_FILE") {
            self.vocab.file = file;
        }
        if let Ok(source) = std::env::var("ZHERO_VOCAB_SOURCE") {
            self.vocab.source = source;
        }
        if let Ok(overwrite) = std::env::var("ZHERO_VOCAB_OVERWRITE") {
            if let Ok(b) = overwrite.parse() {
                self.vocab.overwrite = b;
            }
        }

        if let Ok(port) = std::env::var("ZHERO_ADMIN_PORT") {
            if let Ok(n) = port.parse() {
                self.admin.port = n;
            }
        }
        if let Ok(port) = std::env::var("ZHERO_PUBLIC_PORT") {
            if let Ok(n) = port.parse() {
                self.public.port = n;
            }
        }

        if let Ok(dir) = std::env::var("ZHERO_DATA_DIR") {
            self.storage.data_dir = dir;
        }

        if let Ok(level) = std::env::var("ZHERO_LOG_LEVEL") {
            self.log.level = level;
        }
        if let Ok(format) = std::env::var("ZHERO_LOG_FORMAT") {
            self.log.format = format;
        }
    }

    /// Check the settings that cannot be defaulted away.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.vocab.source.trim().is_empty() {
            return Err(ConfigError::Invalid("vocab.source must not be empty".into()));
        }
        if self.vocab.file.trim().is_empty() {
            return Err(ConfigError::Invalid("vocab.file must not be empty".into()));
        }
        if self.vocab.namespace.trim().is_empty() {
            return Err(ConfigError::Invalid("vocab.namespace must not be empty".into()));
        }
        if self.admin.port == self.public.port {
            return Err(ConfigError::Invalid(format!(
                "admin and public servers cannot share port {}",
                self.admin.port
            )));
        }
        Ok(())
    }

    /// Create a default config file content as a string.
    pub fn default_config_string() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

/// Vocabulary graph configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VocabConfig {
    /// Local path of the cached JSON-LD vocabulary document.
    pub file: String,

    /// Remote URL the document is downloaded from when not cached.
    pub source: String,

    /// Namespace of the vocabulary (stripped from short names).
    pub namespace: String,

    /// Download again even if the local file exists.
    pub overwrite: bool,

    /// Deadline for the download, in seconds.
    pub download_timeout_secs: u64,
}

impl Default for VocabConfig {
    fn default() -> Self {
        Self {
            file: DEFAULT_VOCAB_FILE.to_string(),
            source: DEFAULT_VOCAB_SOURCE.to_string(),
            namespace: DEFAULT_VOCAB_NAMESPACE.to_string(),
            overwrite: false,
            download_timeout_secs: DEFAULT_DOWNLOAD_TIMEOUT_SECS,
        }
    }
}

impl VocabConfig {
    /// Path of the local vocabulary cache.
    pub fn file_path(&self) -> PathBuf {
        PathBuf::from(&self.file)
    }

    /// Download deadline; zero disables it.
    pub fn download_timeout(&self) -> Option<Duration> {
        (self.download_timeout_secs > 0).then(|| Duration::from_secs(self.download_timeout_secs))
    }
}

/// Admin server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Port to listen on.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_ADMIN_PORT,
        }
    }
}

/// Public server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PublicServerConfig {
    /// Port to listen on.
    pub port: u16,
}

impl Default for PublicServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PUBLIC_PORT,
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Base directory for zhero data (default: ".zhero").
    pub data_dir: String,

    /// Schema definitions subdirectory name.
    pub schemas_dir: String,

    /// Page content subdirectory name.
    pub pages_dir: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: DEFAULT_DATA_DIR.to_string(),
            schemas_dir: DEFAULT_SCHEMAS_DIR.to_string(),
            pages_dir: DEFAULT_PAGES_DIR.to_string(),
        }
    }
}

impl StorageConfig {
    /// Get the full path to the schemas directory.
    pub fn schemas_path(&self) -> PathBuf {
        PathBuf::from(&self.data_dir).join(&self.schemas_dir)
    }

    /// Get the full path to the pages directory of a schema.
    pub fn pages_path(&self, schema_name: &str) -> PathBuf {
        PathBuf::from(&self.data_dir)
            .join(&self.pages_dir)
            .join(schema_name)
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Level filter: "trace", "debug", "info", "warn" or "error".
    pub level: String,

    /// Output format: "pretty" or "json".
    pub format: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            format: DEFAULT_LOG_FORMAT.to_string(),
        }
    }
}

impl LogConfig {
    /// Whether JSON output was requested.
    pub fn is_json(&self) -> bool {
        self.format.eq_ignore_ascii_case("json")
    }
}
