//! Configuration loading.
//!
//! Layered precedence: built-in defaults -> config file under the platform
//! config directory -> `BCC_*` environment variables. CLI flags, if any,
//! are applied by the caller after this returns.

use config::{Config, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::BccError;

/// Main engine settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// URI of the external graph store
    #[serde(default = "default_store_uri")]
    pub store_uri: String,

    /// Depth bound applied to subtree reads when the caller does not
    /// pass one explicitly (-1 means unlimited)
    #[serde(default = "default_read_depth")]
    pub default_read_depth: i32,

    /// Maximum number of items a feed returns in one call
    #[serde(default = "default_feed_limit")]
    pub feed_limit: usize,

    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_store_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_read_depth() -> i32 {
    1
}

fn default_feed_limit() -> usize {
    100
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_uri: default_store_uri(),
            default_read_depth: default_read_depth(),
            feed_limit: default_feed_limit(),
            log_level: default_log_level(),
        }
    }
}

impl Settings {
    /// Load settings with layered precedence:
    /// 1. Built-in defaults
    /// 2. Config file (platform config dir, e.g. `~/.config/bcc/config.toml`)
    /// 3. Explicitly named config file (optional)
    /// 4. Environment variables (`BCC_*`)
    pub fn load(config_path: Option<&str>) -> Result<Self, BccError> {
        let config_dir = ProjectDirs::from("", "", "bcc")
            .map(|p| p.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        let default_config_path = config_dir.join("config");

        let mut builder = Config::builder()
            .set_default("store_uri", default_store_uri())
            .map_err(|e| BccError::Config(e.to_string()))?
            .set_default("default_read_depth", default_read_depth() as i64)
            .map_err(|e| BccError::Config(e.to_string()))?
            .set_default("feed_limit", default_feed_limit() as i64)
            .map_err(|e| BccError::Config(e.to_string()))?
            .set_default("log_level", default_log_level())
            .map_err(|e| BccError::Config(e.to_string()))?
            .add_source(File::with_name(&default_config_path.to_string_lossy()).required(false));

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("BCC")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| BccError::Config(e.to_string()))?;

        config
            .try_deserialize()
            .map_err(|e| BccError::Config(e.to_string()))
    }
}
