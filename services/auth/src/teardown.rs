//! Session teardown: the single place a denied credential ends the session

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::{
    context::SessionContext,
    error::DenialReason,
    guard::{BearerToken, CredentialSource, TokenGuard, Verdict},
};

/// Whatever shows the login screen to the user
pub trait LoginSurface: Send + Sync {
    /// Send the user to the login surface after their session ended
    fn redirect_to_login(&self, reason: DenialReason);
}

/// Login surface for headless clients: records the redirect in the log
#[derive(Debug, Clone)]
pub struct TracingLoginSurface {
    route: String,
}

impl TracingLoginSurface {
    /// Create a surface pointing at `route`
    pub fn new(route: impl Into<String>) -> Self {
        Self {
            route: route.into(),
        }
    }
}

impl LoginSurface for TracingLoginSurface {
    fn redirect_to_login(&self, reason: DenialReason) {
        warn!(%reason, route = %self.route, "Session terminated, redirecting to login");
    }
}

/// Front door every outbound call passes through
///
/// Runs the guard; on `Allowed` hands out the bearer token, on `Denied`
/// terminates the session before returning the reason.
#[derive(Clone)]
pub struct SessionGate {
    guard: TokenGuard,
    context: SessionContext,
    surface: Arc<dyn LoginSurface>,
}

impl SessionGate {
    /// Create a gate over `context` that redirects to `surface`
    pub fn new(context: SessionContext, surface: Arc<dyn LoginSurface>) -> Self {
        Self {
            guard: TokenGuard::new(context.clone()),
            context,
            surface,
        }
    }

    /// Session context the gate guards
    pub fn context(&self) -> &SessionContext {
        &self.context
    }

    /// Authorize one outbound call against the system clock
    pub async fn authorize(&self) -> Result<BearerToken, DenialReason> {
        self.authorize_at(Utc::now().timestamp()).await
    }

    /// Authorize one outbound call at `now` (seconds since the epoch)
    ///
    /// A session found only in the vault is restored into memory, unless the
    /// session was established or ended while the vault was being read. In
    /// that case the check runs again against the new state.
    pub async fn authorize_at(&self, now: i64) -> Result<BearerToken, DenialReason> {
        loop {
            match self.guard.check_at(now).await {
                Verdict::Allowed(credential) => {
                    if credential.source == CredentialSource::Vault {
                        let restored = self
                            .context
                            .store()
                            .restore_at(credential.epoch, credential.session.clone())
                            .await;
                        if !restored {
                            debug!("Session changed while reading the vault, checking again");
                            continue;
                        }
                        info!(subject = %credential.session.subject_id(), "Session recovered from vault");
                    }
                    return Ok(credential.bearer());
                }
                Verdict::Denied(reason) => {
                    self.terminate(reason).await;
                    return Err(reason);
                }
            }
        }
    }

    /// End the session: clear the vault, clear memory, show the login surface
    pub async fn terminate(&self, reason: DenialReason) {
        info!(%reason, "Terminating session");
        self.context.clear().await;
        self.surface.redirect_to_login(reason);
    }
}
