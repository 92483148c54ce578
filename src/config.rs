//! Configuration management for the chatroom relay
//!
//! Values come from built-in defaults, then an optional `config.toml`, then
//! `CHATROOM_*` environment variables. Everything here requires a restart.

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::protocol::BUFF_LEN;
use crate::relay::{MAILBOX_CAPACITY, MAX_CLIENTS, OverflowPolicy};

/// Environment variable naming an alternative configuration file.
pub const CONFIG_PATH_ENV: &str = "CHATROOM_CONFIG";

const DEFAULT_CONFIG_PATH: &str = "config";
const ENV_PREFIX: &str = "CHATROOM";

/// Relay configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RelayConfig {
    /// IP address the transport listens on
    pub bind_address: String,

    /// TCP port the transport listens on
    /// Environment: CHATROOM_PORT
    pub port: u16,

    /// Size of the client table, 2 to 20; one slot stays reserved so
    /// `max_clients - 1` clients can be joined at once
    /// Environment: CHATROOM_MAX_CLIENTS
    pub max_clients: usize,

    /// Per-client mailbox budget in bytes
    pub mailbox_capacity: usize,

    /// Behavior of a full mailbox
    pub overflow_policy: OverflowPolicy,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1".to_string(),
            port: 7070,
            max_clients: MAX_CLIENTS,
            mailbox_capacity: MAILBOX_CAPACITY,
            overflow_policy: OverflowPolicy::Truncate,
        }
    }
}

impl RelayConfig {
    /// Load configuration from `$CHATROOM_CONFIG` (or `./config.toml`) with
    /// environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path =
            std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_from(&path)
    }

    /// Load configuration from a specific file; a missing file falls back to
    /// the defaults
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    /// Load configuration from a file, overridden by `<env_prefix>_*`
    /// environment variables
    pub fn load_with_prefix(path: &str, env_prefix: &str) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let settings = Config::builder()
            .set_default("bind_address", defaults.bind_address)?
            .set_default("port", i64::from(defaults.port))?
            .set_default("max_clients", defaults.max_clients as i64)?
            .set_default("mailbox_capacity", defaults.mailbox_capacity as i64)?
            .set_default("overflow_policy", "truncate")?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix(env_prefix))
            .build()?;

        let config: RelayConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validation for all configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bind_address.is_empty() {
            return Err(ConfigError::Message("bind_address cannot be empty".into()));
        }

        if self.port == 0 {
            return Err(ConfigError::Message("port cannot be 0".into()));
        }

        if self.max_clients < 2 || self.max_clients > MAX_CLIENTS {
            return Err(ConfigError::Message(format!(
                "max_clients must be between 2 and {MAX_CLIENTS}"
            )));
        }

        if self.mailbox_capacity < BUFF_LEN {
            return Err(ConfigError::Message(format!(
                "mailbox_capacity must hold at least one line ({BUFF_LEN} bytes)"
            )));
        }

        Ok(())
    }

    /// Bind address and port as a socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_address, self.port)
    }
}
