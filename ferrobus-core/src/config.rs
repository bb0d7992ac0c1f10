//! Host configuration
//!
//! Configuration is read from TOML. Every field has a default, so an empty
//! document is a valid configuration:
//!
//! ```toml
//! [serial]
//! baudrate = 57600
//! parity = "none"
//!
//! [i2c]
//! delay_us = 0
//! debug = false
//! ```

use core::fmt;

use ferrobus_hal::{I2cConfig, SerialConfig};
use serde::{Deserialize, Serialize};

/// Configuration loading errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// TOML syntax error or a field of the wrong type
    Parse,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse => f.write_str("invalid host configuration"),
        }
    }
}

/// Complete host configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HostConfig {
    /// Serial link settings
    pub serial: SerialConfig,
    /// I2C adapter settings
    pub i2c: I2cConfig,
}

impl HostConfig {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|e| {
            warn!("config: {}", e.message());
            ConfigError::Parse
        })
    }
}
