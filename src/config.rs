//! # Configuration Management
//!
//! Centralized configuration for the messaging library.
//!
//! This module provides structured configuration for the codec and signing
//! layers: backing-buffer capacity and the optional shared signing secret.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment-variable overrides via `from_env()`
//!
//! ## Security Considerations
//! - The signing layer accepts secrets of any length; `validate()` reports
//!   secrets shorter than the recommended 64 bytes so misconfiguration is
//!   visible before deployment.

use crate::codec::DEFAULT_CAPACITY;
use crate::error::{MessagingError, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Recommended signing secret length in bytes
pub const RECOMMENDED_SECRET_LEN: usize = 64;

/// Main configuration structure for the messaging library
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct MessagingConfig {
    /// Codec configuration
    #[serde(default)]
    pub codec: CodecConfig,

    /// Signing configuration
    #[serde(default)]
    pub signing: SigningConfig,
}

impl MessagingConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| MessagingError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| MessagingError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| MessagingError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(capacity) = std::env::var("PLUGIN_MESSAGING_BUFFER_CAPACITY") {
            if let Ok(val) = capacity.parse::<usize>() {
                config.codec.buffer_capacity = val;
            }
        }

        if let Ok(secret) = std::env::var("PLUGIN_MESSAGING_SIGNING_SECRET") {
            config.signing.secret = Some(secret);
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        toml::to_string_pretty(&Self::default())
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MessagingError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| MessagingError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.codec.buffer_capacity == 0 {
            errors.push("codec.buffer_capacity must be greater than zero".to_string());
        }

        if let Some(secret) = &self.signing.secret {
            if secret.is_empty() {
                errors.push("signing.secret is set but empty".to_string());
            } else if secret.len() < RECOMMENDED_SECRET_LEN {
                errors.push(format!(
                    "signing.secret is {} bytes; {RECOMMENDED_SECRET_LEN} or more is recommended",
                    secret.len()
                ));
            }
        }

        errors
    }
}

/// Codec configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CodecConfig {
    /// Backing-buffer capacity in bytes for buffers created through
    /// [`Messaging::buffer`](crate::channel::Messaging::buffer)
    pub buffer_capacity: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            buffer_capacity: DEFAULT_CAPACITY,
        }
    }
}

/// Signing configuration
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SigningConfig {
    /// Shared signing secret. When present, helpers built with
    /// [`Messaging::with_config`](crate::channel::Messaging::with_config)
    /// start with signing enabled.
    pub secret: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MessagingConfig::default();
        assert_eq!(config.codec.buffer_capacity, DEFAULT_CAPACITY);
        assert!(config.signing.secret.is_none());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_from_toml() {
        let config = MessagingConfig::from_toml(
            r#"
            [codec]
            buffer_capacity = 1024

            [signing]
            secret = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef"
            "#,
        )
        .unwrap();

        assert_eq!(config.codec.buffer_capacity, 1024);
        assert!(config.signing.secret.is_some());
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = MessagingConfig::from_toml("[signing]\n").unwrap();
        assert_eq!(config.codec.buffer_capacity, DEFAULT_CAPACITY);
    }

    #[test]
    fn test_invalid_toml_rejected() {
        assert!(matches!(
            MessagingConfig::from_toml("codec = \"nope"),
            Err(MessagingError::ConfigError(_))
        ));
    }

    #[test]
    fn test_validate_flags_short_secret() {
        let config = MessagingConfig::default_with_overrides(|c| {
            c.signing.secret = Some("too-short".to_string());
        });
        let errors = config.validate();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("recommended"));
    }

    #[test]
    fn test_validate_flags_zero_capacity() {
        let config = MessagingConfig::default_with_overrides(|c| {
            c.codec.buffer_capacity = 0;
        });
        assert_eq!(config.validate().len(), 1);
    }

    #[test]
    fn test_example_config_parses() {
        let example = MessagingConfig::example_config();
        let config = MessagingConfig::from_toml(&example).unwrap();
        assert_eq!(config.codec.buffer_capacity, DEFAULT_CAPACITY);
    }
}
