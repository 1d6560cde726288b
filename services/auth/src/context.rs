//! Session context owning the in-memory store and the durable vault

use std::sync::Arc;

use common::vault::TokenVault;
use tracing::{error, info};

use crate::{
    error::CredentialError,
    store::{CredentialStore, Session},
};

/// Explicitly owned session state, injected wherever a session is needed
#[derive(Clone)]
pub struct SessionContext {
    store: CredentialStore,
    vault: Arc<dyn TokenVault>,
}

impl SessionContext {
    /// Create a context with an empty store over `vault`
    pub fn new(vault: Arc<dyn TokenVault>) -> Self {
        Self {
            store: CredentialStore::new(),
            vault,
        }
    }

    /// In-memory credential store
    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Durable token vault
    pub fn vault(&self) -> &dyn TokenVault {
        self.vault.as_ref()
    }

    /// Start a session from a freshly issued token
    ///
    /// The token is decoded and stored in memory first; it is only written to
    /// the vault once it is known to be decodable. A vault failure is logged
    /// and does not undo the in-memory session.
    pub async fn establish(&self, token: &str) -> Result<Session, CredentialError> {
        let session = self.store.set(token).await?;

        if let Err(e) = self.vault.save(token).await {
            error!("Failed to persist token to vault: {}", e);
        }

        Ok(session)
    }

    /// Remove the session from the vault and from memory
    ///
    /// Vault errors are logged; the in-memory session is cleared regardless.
    pub async fn clear(&self) {
        if let Err(e) = self.vault.clear().await {
            error!("Failed to clear token vault: {}", e);
        }
        self.store.clear().await;
    }

    /// User-initiated logout
    pub async fn end(&self) {
        info!("Ending session");
        self.clear().await;
    }
}
