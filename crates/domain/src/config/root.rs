use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

use super::errors::ConfigError;
use super::hosts::HostsConfig;
use super::logging::LoggingConfig;
use super::server::ServerConfig;
use super::upstream::UpstreamConfig;
use crate::UpstreamTarget;

const LOCAL_CONFIG_PATH: &str = "hostsdns.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/hostsdns/config.toml";

/// Main configuration structure for hostsdns
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Listener configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Where unanswered queries are forwarded
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// Local overrides
    #[serde(default)]
    pub hosts: HostsConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. hostsdns.toml in current directory
    /// 3. /etc/hostsdns/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if let Some(path) = Self::get_config_path() {
            Self::from_file(&path)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    pub fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(url) = overrides.upstream {
            self.upstream.url = url;
        }
        if let Some(timeout) = overrides.upstream_timeout {
            self.upstream.timeout = timeout;
        }
        if let Some(bind) = overrides.bind_address {
            self.server.bind_address = bind;
        }
        if let Some(ttl) = overrides.ttl {
            self.hosts.ttl = ttl;
        }
        if !overrides.hosts_files.is_empty() {
            self.hosts.files = overrides.hosts_files;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if overrides.verbose {
            self.logging.verbose = true;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "No upstream configured".to_string(),
            ));
        }

        self.upstream_target()?;

        if self.upstream.timeout == 0 {
            return Err(ConfigError::Validation(
                "Upstream timeout cannot be 0".to_string(),
            ));
        }

        if self.server.udp_workers == 0 {
            return Err(ConfigError::Validation(
                "At least one UDP worker is required".to_string(),
            ));
        }

        self.bind_addr()?;

        Ok(())
    }

    pub fn upstream_target(&self) -> Result<UpstreamTarget, ConfigError> {
        self.upstream
            .url
            .parse::<UpstreamTarget>()
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.server.bind_address.parse().map_err(|_| {
            ConfigError::Validation(format!(
                "Invalid bind address '{}'",
                self.server.bind_address
            ))
        })
    }

    /// Get the path to the configuration file being used
    pub fn get_config_path() -> Option<String> {
        if Path::new(LOCAL_CONFIG_PATH).exists() {
            Some(LOCAL_CONFIG_PATH.to_string())
        } else if Path::new(SYSTEM_CONFIG_PATH).exists() {
            Some(SYSTEM_CONFIG_PATH.to_string())
        } else {
            None
        }
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub upstream: Option<String>,
    pub upstream_timeout: Option<u64>,
    pub bind_address: Option<String>,
    pub ttl: Option<u32>,
    pub hosts_files: Vec<String>,
    pub log_level: Option<String>,
    pub verbose: bool,
}
