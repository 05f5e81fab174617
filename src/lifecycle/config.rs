//! System configuration, loaded from TOML.
//!
//! ```toml
//! actor_buffer_size = 64
//! default_role = "supervisor"
//!
//! [retry]
//! max_attempts = 5
//! backoff_ms = 100
//! ```
//!
//! Every key is optional.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

use crate::clients::RetryPolicy;
use crate::model::Role;

/// Environment variable naming the configuration file the binary loads.
pub const CONFIG_ENV: &str = "FIELDOPS_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Validation(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub backoff_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_ms: 50,
        }
    }
}

impl RetryConfig {
    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            backoff: Duration::from_millis(self.backoff_ms),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    /// Capacity of each actor's request channel.
    pub actor_buffer_size: usize,
    /// Role assumed until a user selects one.
    pub default_role: Role,
    pub retry: RetryConfig,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            actor_buffer_size: 32,
            default_role: Role::Supervisor,
            retry: RetryConfig::default(),
        }
    }
}

impl SystemConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: SystemConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads the file named by `FIELDOPS_CONFIG`, or the defaults when it is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.actor_buffer_size == 0 {
            return Err(ConfigError::Validation(
                "actor_buffer_size must be greater than zero".into(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Validation(
                "retry.max_attempts must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}
