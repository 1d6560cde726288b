//! Error types for the auth crate

use serde::Deserialize;
use thiserror::Error;

/// A token could not be turned into a session
#[derive(Error, Debug)]
pub enum CredentialError {
    /// The token is not a decodable JWT or lacks the `exp`/`sub` claims
    #[error("Malformed credential: {0}")]
    Malformed(#[source] jsonwebtoken::errors::Error),
}

/// Why the guard refused to let an outbound call proceed
///
/// Every reason terminates the session.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// No session in memory and no token in the durable vault
    #[error("no credential")]
    NoCredential,

    /// The session's expiry is at or before the current time
    #[error("credential expired")]
    CredentialExpired,

    /// The stored token could not be decoded
    #[error("malformed credential")]
    MalformedCredential,
}

impl From<CredentialError> for DenialReason {
    fn from(_: CredentialError) -> Self {
        DenialReason::MalformedCredential
    }
}

/// Error returned by login and registration
#[derive(Error, Debug)]
pub enum LoginError {
    /// The request never completed
    #[error("Login request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service refused the credentials or the registration payload
    #[error("Login rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The service answered with a token the client cannot decode
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

/// Error body the booking service answers with on any failed request
#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub message: String,
}

impl ApiErrorResponse {
    /// Message of an error body, or the raw body when it is not one
    pub fn message_of(body: String) -> String {
        serde_json::from_str::<ApiErrorResponse>(&body)
            .map(|e| e.message)
            .unwrap_or(body)
    }
}
