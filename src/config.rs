//! Data manager configuration
//!
//! Loaded from a JSON file. Every field has a default, so a partial file (or
//! no file at all) yields a usable configuration.

use std::path::Path;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::errors::{DataManagerError, DmResult};
use crate::project::SignedUrlResolver;
use crate::record::{is_valid_format, DEFAULT_DATETIME_FORMAT};

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataManagerConfig {
    /// strftime format for completion timestamps
    #[serde(default = "default_datetime_format")]
    pub datetime_format: String,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub http: HttpServerConfig,

    #[serde(default)]
    pub log: LogConfig,
}

fn default_datetime_format() -> String {
    DEFAULT_DATETIME_FORMAT.to_string()
}

impl Default for DataManagerConfig {
    fn default() -> Self {
        Self {
            datetime_format: default_datetime_format(),
            storage: StorageConfig::default(),
            http: HttpServerConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl DataManagerConfig {
    /// Load configuration from a JSON file; a missing file yields defaults
    pub fn load(path: &Path) -> DmResult<Self> {
        if !path.exists() {
            tracing::debug!(event = "CONFIG_DEFAULTS", path = %path.display(), "config file not found");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            DataManagerError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_json(&contents)
    }

    /// Parse configuration from JSON text
    pub fn from_json(contents: &str) -> DmResult<Self> {
        let config: Self =
            serde_json::from_str(contents).map_err(|e| DataManagerError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the query and URI paths cannot use
    pub fn validate(&self) -> DmResult<()> {
        if !is_valid_format(&self.datetime_format) {
            return Err(DataManagerError::Config(format!(
                "invalid datetime_format: '{}'",
                self.datetime_format
            )));
        }
        self.storage.url_ttl()?;
        Ok(())
    }
}

/// Signed storage URL settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default)]
    pub signing_secret: String,

    #[serde(default = "default_url_ttl_secs")]
    pub url_ttl_secs: i64,
}

fn default_base_url() -> String {
    "http://localhost:8080".to_string()
}

fn default_url_ttl_secs() -> i64 {
    3600
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            signing_secret: String::new(),
            url_ttl_secs: default_url_ttl_secs(),
        }
    }
}

impl StorageConfig {
    /// Signed URL lifetime; must be positive and representable
    pub fn url_ttl(&self) -> DmResult<Duration> {
        Duration::try_seconds(self.url_ttl_secs)
            .filter(|ttl| *ttl > Duration::zero())
            .ok_or_else(|| {
                DataManagerError::Config(format!("invalid url_ttl_secs: {}", self.url_ttl_secs))
            })
    }

    /// Build the URI resolver these settings describe
    pub fn resolver(&self) -> DmResult<SignedUrlResolver> {
        Ok(SignedUrlResolver::new(
            self.base_url.clone(),
            self.signing_secret.as_bytes(),
            self.url_ttl()?,
        ))
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpServerConfig {
    /// Host to bind to (default: "127.0.0.1")
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to bind to (default: 8080)
    #[serde(default = "default_port")]
    pub port: u16,

    /// CORS allowed origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8080
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

impl HttpServerConfig {
    /// Create a new config with specified port
    pub fn with_port(port: u16) -> Self {
        Self {
            port,
            ..Default::default()
        }
    }

    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive, overridden by `RUST_LOG`
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable text
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}
