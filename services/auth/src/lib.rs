//! Session handling for the vet-clinic booking client
//!
//! - [`store`]: the in-memory credential store and the decoded [`Session`]
//! - [`context`]: the owned [`SessionContext`] pairing the store with the durable vault
//! - [`guard`]: the [`TokenGuard`], judging every outbound call
//! - [`teardown`]: the [`SessionGate`], ending the session when the guard says no
//! - [`login`]: login and registration

pub mod claims;
pub mod context;
pub mod error;
pub mod guard;
pub mod login;
pub mod store;
pub mod teardown;

pub use context::SessionContext;
pub use error::{ApiErrorResponse, CredentialError, DenialReason, LoginError};
pub use guard::{BearerToken, TokenGuard, Verdict};
pub use login::{AuthClient, RegisterRequest};
pub use store::{CredentialStore, Session};
pub use teardown::{LoginSurface, SessionGate, TracingLoginSurface};
