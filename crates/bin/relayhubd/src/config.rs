//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `relayhub.toml` in the working directory. Every field has a
//! sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::time::Duration;

use chrono::TimeDelta;
use serde::Deserialize;

use relayhub_app::hub::HubSettings;
use relayhub_domain::device::{Device, OutputHandle};
use relayhub_domain::error::RelayHubError;

/// Top-level configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server settings.
    pub server: ServerConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Who may send commands.
    pub auth: AuthConfig,
    /// Command grammar settings.
    pub commands: CommandsConfig,
    /// Usage accounting settings.
    pub usage: UsageConfig,
    /// Tick loop settings.
    pub scheduler: SchedulerConfig,
    /// Controlled outputs, in display order.
    pub devices: Vec<DeviceConfig>,
}

/// HTTP listener configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind to (e.g. `0.0.0.0`).
    pub host: String,
    /// TCP port.
    pub port: u16,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// Authorization configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// The single sender identifier allowed to issue commands.
    pub authorized_sender: String,
}

/// Command grammar configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct CommandsConfig {
    /// One non-alphanumeric character every command starts with.
    pub prefix: String,
}

/// Usage accounting configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct UsageConfig {
    /// Length of one accounting period, in seconds.
    pub period_secs: u32,
}

/// Tick loop configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// How often deadlines and the period boundary are checked.
    pub tick_interval_ms: u64,
}

/// One controlled output.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DeviceConfig {
    pub name: String,
    pub pin: u8,
}

impl Config {
    /// Load configuration from `relayhub.toml` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// result fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("relayhub.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("RELAYHUB_HOST") {
            self.server.host = val;
        }
        if let Ok(val) = std::env::var("RELAYHUB_PORT") {
            if let Ok(port) = val.parse() {
                self.server.port = port;
            }
        }
        if let Ok(val) = std::env::var("RELAYHUB_BIND") {
            if let Some((host, port)) = val.rsplit_once(':') {
                self.server.host = host.to_string();
                if let Ok(port) = port.parse() {
                    self.server.port = port;
                }
            }
        }
        if let Ok(val) = std::env::var("RELAYHUB_AUTHORIZED_SENDER") {
            self.auth.authorized_sender = val;
        }
        if let Ok(val) = std::env::var("RELAYHUB_LOG") {
            self.logging.filter = val;
        }
        if let Ok(val) = std::env::var("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Validation("port must be non-zero".to_string()));
        }
        if self.auth.authorized_sender.trim().is_empty() {
            return Err(ConfigError::Validation(
                "authorized sender must not be empty".to_string(),
            ));
        }
        if self.command_prefix().is_none() {
            return Err(ConfigError::Validation(format!(
                "command prefix {:?} must be a single non-alphanumeric character",
                self.commands.prefix
            )));
        }
        if self.usage.period_secs == 0 {
            return Err(ConfigError::Validation(
                "usage period must be non-zero".to_string(),
            ));
        }
        if self.scheduler.tick_interval_ms == 0 {
            return Err(ConfigError::Validation(
                "tick interval must be non-zero".to_string(),
            ));
        }
        if self.devices.is_empty() {
            return Err(ConfigError::Validation(
                "at least one device must be configured".to_string(),
            ));
        }
        Ok(())
    }

    /// Return the `host:port` bind address.
    #[must_use]
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// The prefix as a character, if it is a valid one.
    #[must_use]
    pub fn command_prefix(&self) -> Option<char> {
        let mut chars = self.commands.prefix.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if !c.is_alphanumeric() && !c.is_whitespace() => Some(c),
            _ => None,
        }
    }

    #[must_use]
    pub fn usage_period(&self) -> TimeDelta {
        TimeDelta::seconds(i64::from(self.usage.period_secs))
    }

    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.scheduler.tick_interval_ms)
    }

    /// Settings for the hub.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] when the prefix is invalid.
    pub fn hub_settings(&self) -> Result<HubSettings, ConfigError> {
        let prefix = self.command_prefix().ok_or_else(|| {
            ConfigError::Validation("command prefix is invalid".to_string())
        })?;
        Ok(HubSettings {
            authorized_sender: self.auth.authorized_sender.clone(),
            prefix,
            usage_period: self.usage_period(),
        })
    }

    /// Build the configured devices, in order.
    ///
    /// # Errors
    ///
    /// Returns [`RelayHubError::Validation`] when a name is empty or contains
    /// whitespace.
    pub fn build_devices(&self) -> Result<Vec<Device>, RelayHubError> {
        self.devices
            .iter()
            .map(|device| {
                Device::builder()
                    .name(device.name.clone())
                    .output(OutputHandle::new(device.pin))
                    .build()
            })
            .collect()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            auth: AuthConfig::default(),
            commands: CommandsConfig::default(),
            usage: UsageConfig::default(),
            scheduler: SchedulerConfig::default(),
            devices: default_devices(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "relayhubd=info,relayhub=info,tower_http=debug".to_string(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            authorized_sender: "123456789".to_string(),
        }
    }
}

impl Default for CommandsConfig {
    fn default() -> Self {
        Self {
            prefix: "/".to_string(),
        }
    }
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            period_secs: 86_400,
        }
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 1000,
        }
    }
}

fn default_devices() -> Vec<DeviceConfig> {
    [("light", 12), ("fan", 14), ("ac", 27), ("tv", 26), ("geyser", 25)]
        .into_iter()
        .map(|(name, pin)| DeviceConfig {
            name: name.to_string(),
            pin,
        })
        .collect()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
