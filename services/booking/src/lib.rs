//! Booking client for the vet-clinic resource-allocation service
//!
//! [`SlotClient`] exposes the slot and appointment operations, each authorized
//! through the session gate of the `auth` crate. [`saga`] sequences them to
//! move an appointment from one slot to another.

pub mod client;
pub mod error;
pub mod http;
pub mod models;
pub mod saga;
pub mod transport;

pub use client::SlotClient;
pub use error::{ClientError, ClientResult, Resource, SagaError, TransportError};
pub use http::HttpTransport;
pub use models::{Appointment, AppointmentId, PetId, Slot, SlotId, SlotKind, SlotStatus, VetId};
pub use saga::{Failure, PartialState, Phase, SagaRun, Step, reassign_slot};
pub use transport::SlotTransport;
