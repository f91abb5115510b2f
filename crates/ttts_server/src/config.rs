//! Server configuration.

use crate::error::ConfigError;
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Configuration for the match server.
///
/// Every field has a default, so an empty TOML file is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct ServerConfig {
    /// Address to bind the listener to.
    #[serde(default = "default_host")]
    #[setters(into)]
    host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    port: u16,

    /// Seconds the current mover has to make a legal move. Zero disables the deadline.
    #[serde(default = "default_move_timeout_secs")]
    move_timeout_secs: u64,

    /// Longest accepted input line, in bytes.
    #[serde(default = "default_max_line_length")]
    max_line_length: usize,

    /// Seconds an outbound write may wait on a peer that is not reading. Zero disables the limit.
    #[serde(default = "default_write_timeout_secs")]
    write_timeout_secs: u64,

    /// Run a single match and exit instead of pairing connections forever.
    #[serde(default)]
    single_match: bool,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    58901
}

fn default_move_timeout_secs() -> u64 {
    300
}

fn default_max_line_length() -> usize {
    256
}

fn default_write_timeout_secs() -> u64 {
    10
}

impl ServerConfig {
    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(host = %config.host, port = config.port, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if given and present, defaults otherwise.
    #[instrument]
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) if path.exists() => Self::from_file(path),
            Some(path) => {
                info!(
                    "Config file not found at {}, using defaults",
                    path.display()
                );
                Ok(Self::default())
            }
            None => Ok(Self::default()),
        }
    }

    /// Rejects values the server cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_line_length == 0 {
            return Err(ConfigError::new("max_line_length must be greater than zero"));
        }
        Ok(())
    }

    /// The per-turn deadline, if enabled.
    pub fn move_timeout(&self) -> Option<Duration> {
        (self.move_timeout_secs > 0).then(|| Duration::from_secs(self.move_timeout_secs))
    }

    /// The limit on each outbound write, if enabled.
    pub fn write_timeout(&self) -> Option<Duration> {
        (self.write_timeout_secs > 0).then(|| Duration::from_secs(self.write_timeout_secs))
    }

    /// `host:port` for binding.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            move_timeout_secs: default_move_timeout_secs(),
            max_line_length: default_max_line_length(),
            write_timeout_secs: default_write_timeout_secs(),
            single_match: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_address(), "0.0.0.0:58901");
        assert_eq!(config.move_timeout(), Some(Duration::from_secs(300)));
        assert_eq!(config.write_timeout(), Some(Duration::from_secs(10)));
        assert!(!config.single_match());
    }

    #[test]
    fn test_zero_timeout_disables_deadline() {
        let config = ServerConfig::default().with_move_timeout_secs(0);
        assert_eq!(config.move_timeout(), None);
        let config = ServerConfig::default().with_write_timeout_secs(0);
        assert_eq!(config.write_timeout(), None);
    }

    #[test]
    fn test_zero_line_length_invalid() {
        let config = ServerConfig::default().with_max_line_length(0);
        assert!(config.validate().is_err());
    }
}
