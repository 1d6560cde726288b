//! Common library for the vet-clinic booking client
//!
//! This crate provides functionality shared by the auth and booking crates:
//! configuration loading, the durable token vault, and their error types.

pub mod config;
pub mod error;
pub mod vault;

pub use config::ClientConfig;
pub use vault::{MemoryVault, RedisVault, TokenVault};
