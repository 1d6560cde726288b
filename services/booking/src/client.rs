//! Resource-allocation client: every call passes the session gate first

use auth::{BearerToken, SessionGate};
use tracing::{debug, instrument};

use crate::{
    error::ClientResult,
    models::{Appointment, AppointmentId, Slot, SlotId, SlotKind},
    transport::SlotTransport,
};

/// Typed accessors for the slot and appointment operations
///
/// A call denied by the gate fails with [`ClientError::Denied`](crate::ClientError::Denied)
/// and never reaches the transport.
#[derive(Clone)]
pub struct SlotClient<T> {
    gate: SessionGate,
    transport: T,
}

impl<T: SlotTransport> SlotClient<T> {
    /// Create a client sending through `transport`, authorized by `gate`
    pub fn new(gate: SessionGate, transport: T) -> Self {
        Self { gate, transport }
    }

    /// Session gate the client authorizes with
    pub fn gate(&self) -> &SessionGate {
        &self.gate
    }

    async fn authorize(&self) -> ClientResult<BearerToken> {
        Ok(self.gate.authorize().await?)
    }

    /// Free slots offered for rescheduling
    #[instrument(skip(self))]
    pub async fn list_available_slots(&self) -> ClientResult<Vec<Slot>> {
        self.list_slots(SlotKind::Priority).await
    }

    /// Free slots of the given listing
    #[instrument(skip(self))]
    pub async fn list_slots(&self, kind: SlotKind) -> ClientResult<Vec<Slot>> {
        let bearer = self.authorize().await?;
        let slots = self.transport.list_available_slots(&bearer, kind).await?;
        debug!(count = slots.len(), "Fetched available slots");
        Ok(slots)
    }

    #[instrument(skip(self))]
    pub async fn get_slot(&self, id: SlotId) -> ClientResult<Slot> {
        let bearer = self.authorize().await?;
        self.transport.get_slot(&bearer, id).await
    }

    #[instrument(skip(self))]
    pub async fn book_slot(&self, id: SlotId) -> ClientResult<()> {
        let bearer = self.authorize().await?;
        self.transport.book_slot(&bearer, id).await
    }

    #[instrument(skip(self))]
    pub async fn release_slot(&self, id: SlotId) -> ClientResult<()> {
        let bearer = self.authorize().await?;
        self.transport.release_slot(&bearer, id).await
    }

    #[instrument(skip(self))]
    pub async fn get_appointment(&self, id: AppointmentId) -> ClientResult<Appointment> {
        let bearer = self.authorize().await?;
        self.transport.get_appointment(&bearer, id).await
    }

    #[instrument(skip(self))]
    pub async fn repoint_appointment(&self, id: AppointmentId, slot_id: SlotId) -> ClientResult<()> {
        let bearer = self.authorize().await?;
        self.transport.repoint_appointment(&bearer, id, slot_id).await
    }
}
