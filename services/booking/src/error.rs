//! Error types for the booking client

use std::fmt;

use auth::DenialReason;
use thiserror::Error;

use crate::models::{AppointmentId, SlotId};

/// Remote resource a request was about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    Slot(SlotId),
    Appointment(AppointmentId),
    /// A listing (no single resource)
    Listing,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Resource::Slot(id) => write!(f, "{id}"),
            Resource::Appointment(id) => write!(f, "{id}"),
            Resource::Listing => f.write_str("listing"),
        }
    }
}

/// Failure below the booking semantics: network, or an unexpected answer
#[derive(Error, Debug)]
pub enum TransportError {
    /// The request never completed, or the body could not be decoded
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The service answered with a status the client has no meaning for
    #[error("Service responded {status}: {message}")]
    Status { status: u16, message: String },
}

/// Error of a call to the resource-allocation service
#[derive(Error, Debug)]
pub enum ClientError {
    /// The guard refused the call; it never left the client
    #[error("Request denied: {0}")]
    Denied(#[from] DenialReason),

    /// The slot is no longer free
    #[error("Conflict on {0}")]
    Conflict(Resource),

    /// The id is stale or unknown
    #[error("{0} not found")]
    NotFound(Resource),

    /// Network or server-side failure, surfaced as-is
    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl ClientError {
    /// Whether the session was terminated because of this error
    pub fn ended_session(&self) -> bool {
        matches!(self, ClientError::Denied(_))
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::Transport(TransportError::Network(e))
    }
}

/// Misuse of a saga run by its caller
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SagaError {
    /// The target is the slot the appointment already holds
    #[error("target {0} is the slot the appointment already holds")]
    SameSlot(SlotId),

    /// A target can only be confirmed while selecting
    #[error("target can only be confirmed while selecting")]
    NotSelecting,

    /// The run was executed before a target was confirmed
    #[error("no target slot confirmed")]
    NotConfirmed,

    /// The run already started or finished; start a new run instead
    #[error("run cannot be resumed; start a new reassignment")]
    NotResumable,
}

/// Type alias for client results
pub type ClientResult<T> = Result<T, ClientError>;
