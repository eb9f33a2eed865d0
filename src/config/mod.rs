//! Server configuration.
//!
//! Values are layered, lowest priority first:
//!
//! 1. Hardcoded defaults
//! 2. TOML config file (`--config path`)
//! 3. Environment variables (`BATCHSORT_*` prefix)
//! 4. Command line flags (applied by the binary)
//!
//! ```toml
//! listen_addr = "127.0.0.1:9000"
//! log_level = "debug"
//! pool_workers = 8
//! max_body_bytes = 16777216
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::num::NonZeroUsize;
use std::path::Path;
use tracing::debug;

/// Valid log levels for configuration validation.
pub const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Prefix shared by every environment override.
pub const ENV_PREFIX: &str = "BATCHSORT_";

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Worker count for the pooled executor.
    #[serde(default = "default_pool_workers")]
    pub pool_workers: usize,

    /// Largest request body accepted, in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_pool_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(4)
}

fn default_max_body_bytes() -> usize {
    64 * 1024 * 1024
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            log_level: default_log_level(),
            pool_workers: default_pool_workers(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

impl ServerConfig {
    /// Defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`, which maps a full variable name
    /// (e.g. `BATCHSORT_LOG_LEVEL`) to its value.
    pub fn apply_env_from<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(&format!("{ENV_PREFIX}{name}"));

        if let Some(addr) = var("LISTEN_ADDR") {
            self.listen_addr = addr.trim().parse()?;
        }
        if let Some(level) = var("LOG_LEVEL") {
            self.log_level = level.trim().to_lowercase();
        }
        if let Some(workers) = var("POOL_WORKERS") {
            self.pool_workers = workers.trim().parse().map_err(|e| {
                Error::Config(format!("{ENV_PREFIX}POOL_WORKERS={workers:?}: {e}"))
            })?;
        }
        if let Some(limit) = var("MAX_BODY_BYTES") {
            self.max_body_bytes = limit.trim().parse().map_err(|e| {
                Error::Config(format!("{ENV_PREFIX}MAX_BODY_BYTES={limit:?}: {e}"))
            })?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if !VALID_LOG_LEVELS.contains(&self.log_level.as_str()) {
            return Err(Error::Config(format!(
                "log_level must be one of {}, got {:?}",
                VALID_LOG_LEVELS.join(", "),
                self.log_level
            )));
        }
        if self.pool_workers == 0 {
            return Err(Error::Config("pool_workers must be at least 1".to_string()));
        }
        if self.max_body_bytes == 0 {
            return Err(Error::Config("max_body_bytes must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Validated worker count for the pooled executor.
    pub fn pool_workers(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.pool_workers)
            .ok_or_else(|| Error::Config("pool_workers must be at least 1".to_string()))
    }
}
