//! Custom error types for the common library
//!
//! This module defines the errors raised by configuration loading and by the
//! durable token vault.

use thiserror::Error;

/// Error raised while loading client configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration sources could not be read or deserialized
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// A value was present but unusable
    #[error("Invalid configuration value for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

/// Error raised by a durable token vault
#[derive(Error, Debug)]
pub enum VaultError {
    /// Error occurred while connecting to the backing store
    #[error("Vault connection error: {0}")]
    Connection(#[source] redis::RedisError),

    /// Error occurred while reading or writing the stored token
    #[error("Vault command error: {0}")]
    Command(#[source] redis::RedisError),
}

/// Type alias for Result with ConfigError
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Type alias for Result with VaultError
pub type VaultResult<T> = Result<T, VaultError>;
