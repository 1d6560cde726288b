//! Contract of the resource-allocation service
//!
//! One method per remote operation, one request/response each, no state. The
//! caller supplies the bearer token; authorizing the call is not the
//! transport's concern (see [`SlotClient`](crate::client::SlotClient)).

use async_trait::async_trait;
use auth::BearerToken;

use crate::{
    error::ClientResult,
    models::{Appointment, AppointmentId, Slot, SlotId, SlotKind},
};

#[async_trait]
pub trait SlotTransport: Send + Sync {
    /// Slots currently free in the given listing
    async fn list_available_slots(
        &self,
        bearer: &BearerToken,
        kind: SlotKind,
    ) -> ClientResult<Vec<Slot>>;

    /// A single slot
    async fn get_slot(&self, bearer: &BearerToken, id: SlotId) -> ClientResult<Slot>;

    /// Mark a free slot booked. `Conflict` when it is not free any more.
    async fn book_slot(&self, bearer: &BearerToken, id: SlotId) -> ClientResult<()>;

    /// Mark a booked slot free. `NotFound` on an unknown id.
    async fn release_slot(&self, bearer: &BearerToken, id: SlotId) -> ClientResult<()>;

    /// A single appointment
    async fn get_appointment(
        &self,
        bearer: &BearerToken,
        id: AppointmentId,
    ) -> ClientResult<Appointment>;

    /// Point an appointment at another slot. `NotFound` on an unknown id.
    async fn repoint_appointment(
        &self,
        bearer: &BearerToken,
        id: AppointmentId,
        slot_id: SlotId,
    ) -> ClientResult<()>;
}
