//! Durable token vault
//!
//! The vault is the side-store that survives a restart of the client. The
//! in-memory credential store is always consulted first; the vault is only
//! read when memory is empty, and is cleared whenever the session is
//! terminated.

use async_trait::async_trait;
use redis::{AsyncCommands, Client};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{VaultError, VaultResult};

/// Storage for the raw bearer token of the current session
#[async_trait]
pub trait TokenVault: Send + Sync {
    /// Read the stored token, if any
    async fn load(&self) -> VaultResult<Option<String>>;

    /// Store a token, replacing any previous one
    async fn save(&self, token: &str) -> VaultResult<()>;

    /// Remove the stored token. Removing an absent token is not an error.
    async fn clear(&self) -> VaultResult<()>;
}

/// Vault backed by a single Redis key
pub struct RedisVault {
    client: Client,
    key: String,
}

impl RedisVault {
    /// Open a Redis-backed vault storing the token under `key`
    pub fn open(url: &str, key: impl Into<String>) -> VaultResult<Self> {
        let client = Client::open(url).map_err(VaultError::Connection)?;
        let key = key.into();
        info!(url, key = %key, "Redis token vault initialized");
        Ok(RedisVault { client, key })
    }

    async fn get_connection(&self) -> VaultResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(VaultError::Connection)
    }

    /// Check if Redis is reachable
    pub async fn health_check(&self) -> VaultResult<bool> {
        let mut conn = self.get_connection().await?;
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(VaultError::Command)?;
        Ok(pong == "PONG")
    }
}

#[async_trait]
impl TokenVault for RedisVault {
    async fn load(&self) -> VaultResult<Option<String>> {
        let mut conn = self.get_connection().await?;
        let value: Option<String> = conn.get(&self.key).await.map_err(VaultError::Command)?;
        debug!(key = %self.key, found = value.is_some(), "Loaded token from vault");
        Ok(value)
    }

    async fn save(&self, token: &str) -> VaultResult<()> {
        let mut conn = self.get_connection().await?;
        let _: () = conn
            .set(&self.key, token)
            .await
            .map_err(VaultError::Command)?;
        Ok(())
    }

    async fn clear(&self) -> VaultResult<()> {
        let mut conn = self.get_connection().await?;
        let _: u64 = conn.del(&self.key).await.map_err(VaultError::Command)?;
        Ok(())
    }
}

/// Process-local vault, used when no Redis URL is configured and in tests
#[derive(Debug, Default)]
pub struct MemoryVault {
    token: Mutex<Option<String>>,
}

impl MemoryVault {
    /// Create an empty vault
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a vault that already holds `token`
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: Mutex::new(Some(token.into())),
        }
    }
}

#[async_trait]
impl TokenVault for MemoryVault {
    async fn load(&self) -> VaultResult<Option<String>> {
        Ok(self.token.lock().await.clone())
    }

    async fn save(&self, token: &str) -> VaultResult<()> {
        *self.token.lock().await = Some(token.to_string());
        Ok(())
    }

    async fn clear(&self) -> VaultResult<()> {
        self.token.lock().await.take();
        Ok(())
    }
}
