//! In-memory credential store

use std::fmt;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::info;

use crate::{claims::decode_claims, error::CredentialError};

/// Decoded session credential
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    expires_at: i64,
    subject_id: String,
}

impl Session {
    /// Build a session by decoding the claims embedded in `token`
    pub fn decode(token: impl Into<String>) -> Result<Self, CredentialError> {
        let token = token.into();
        let claims = decode_claims(&token)?;
        Ok(Session {
            token,
            expires_at: claims.exp,
            subject_id: claims.sub,
        })
    }

    /// Raw bearer token
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Expiry, seconds since the epoch
    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Subject the token was issued for
    pub fn subject_id(&self) -> &str {
        &self.subject_id
    }

    /// Whether the session is expired at `now` (seconds since the epoch)
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at <= now
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("subject_id", &self.subject_id)
            .finish()
    }
}

#[derive(Default)]
struct SessionCell {
    session: Option<Session>,
    /// Bumped whenever a session is established or cleared
    epoch: u64,
}

/// Holder of the single live session of a session context
///
/// Cloning yields another handle to the same session.
#[derive(Clone, Default)]
pub struct CredentialStore {
    cell: Arc<RwLock<SessionCell>>,
}

impl CredentialStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `token` and store it as the current session
    ///
    /// Replaces any previous session. On a malformed token nothing is stored
    /// and the previous session, if any, is left in place.
    pub async fn set(&self, token: impl Into<String>) -> Result<Session, CredentialError> {
        let session = Session::decode(token)?;
        info!(subject = %session.subject_id, expires_at = session.expires_at, "Session stored");

        let mut cell = self.cell.write().await;
        cell.session = Some(session.clone());
        cell.epoch += 1;
        Ok(session)
    }

    /// Current session together with the epoch it was read at
    pub(crate) async fn snapshot(&self) -> (Option<Session>, u64) {
        let cell = self.cell.read().await;
        (cell.session.clone(), cell.epoch)
    }

    /// Store a session read from the vault, unless the store changed since `epoch`
    ///
    /// Returns whether the session was stored.
    pub(crate) async fn restore_at(&self, epoch: u64, session: Session) -> bool {
        let mut cell = self.cell.write().await;
        if cell.epoch != epoch {
            return false;
        }
        info!(subject = %session.subject_id, expires_at = session.expires_at, "Session restored");
        cell.session = Some(session);
        true
    }

    /// Current session, if any
    pub async fn get(&self) -> Option<Session> {
        self.cell.read().await.session.clone()
    }

    /// Drop the current session
    pub async fn clear(&self) {
        let mut cell = self.cell.write().await;
        cell.epoch += 1;
        if let Some(session) = cell.session.take() {
            info!(subject = %session.subject_id, "Session cleared");
        }
    }
}
