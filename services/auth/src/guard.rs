//! Token guard deciding whether an outbound call may proceed
//!
//! The guard only reads: it resolves the current credential, judges it against
//! the clock and returns a [`Verdict`]. Reacting to a denial (tearing the
//! session down, sending the user to the login surface) is the job of
//! [`SessionGate`](crate::teardown::SessionGate).

use std::fmt;

use tracing::{debug, warn};

use crate::{context::SessionContext, error::DenialReason, store::Session};

/// Bearer credential attached to an outbound call
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken(String);

impl BearerToken {
    /// Raw token, for the `Authorization` header
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(<redacted>)")
    }
}

/// Where an allowed credential was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    /// The in-memory store
    Memory,
    /// The durable vault (memory was empty)
    Vault,
}

/// Credential that passed the guard
#[derive(Debug, Clone)]
pub struct Credential {
    pub session: Session,
    pub source: CredentialSource,
    /// Store epoch observed before the credential was resolved
    pub(crate) epoch: u64,
}

impl Credential {
    /// Bearer token to attach to the call
    pub fn bearer(&self) -> BearerToken {
        BearerToken(self.session.token().to_string())
    }
}

/// Outcome of a guard check
#[derive(Debug, Clone)]
pub enum Verdict {
    Allowed(Credential),
    Denied(DenialReason),
}

/// Guard over the session context
#[derive(Clone)]
pub struct TokenGuard {
    context: SessionContext,
}

impl TokenGuard {
    /// Create a guard reading from `context`
    pub fn new(context: SessionContext) -> Self {
        Self { context }
    }

    /// Judge the current credential at `now` (seconds since the epoch)
    pub async fn check_at(&self, now: i64) -> Verdict {
        let credential = match self.resolve().await {
            Ok(Some(credential)) => credential,
            Ok(None) => {
                warn!("No token found, denying request");
                return Verdict::Denied(DenialReason::NoCredential);
            }
            Err(reason) => {
                warn!(%reason, "Stored token could not be decoded, denying request");
                return Verdict::Denied(reason);
            }
        };

        if credential.session.is_expired_at(now) {
            warn!(
                subject = %credential.session.subject_id(),
                expires_at = credential.session.expires_at(),
                now,
                "Token expired, denying request"
            );
            return Verdict::Denied(DenialReason::CredentialExpired);
        }

        debug!(subject = %credential.session.subject_id(), source = ?credential.source, "Request allowed");
        Verdict::Allowed(credential)
    }

    /// Find the current credential: memory first, then the vault
    async fn resolve(&self) -> Result<Option<Credential>, DenialReason> {
        let (session, epoch) = self.context.store().snapshot().await;
        if let Some(session) = session {
            return Ok(Some(Credential {
                session,
                source: CredentialSource::Memory,
                epoch,
            }));
        }

        let token = match self.context.vault().load().await {
            Ok(token) => token,
            Err(e) => {
                warn!("Failed to read token vault, treating as empty: {}", e);
                None
            }
        };

        match token {
            Some(token) => {
                let session = Session::decode(token)?;
                Ok(Some(Credential {
                    session,
                    source: CredentialSource::Vault,
                    epoch,
                }))
            }
            None => Ok(None),
        }
    }
}
