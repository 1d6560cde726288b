//! Shared test support: an in-memory booking service and session helpers

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use auth::{
    BearerToken, DenialReason, LoginSurface, SessionContext, SessionGate, claims::Claims,
};
use booking::{
    Appointment, AppointmentId, ClientError, ClientResult, PetId, Resource, Slot, SlotClient,
    SlotId, SlotKind, SlotStatus, SlotTransport, TransportError, VetId,
};
use chrono::{NaiveDate, NaiveTime, Utc};
use common::MemoryVault;
use jsonwebtoken::{EncodingKey, Header, encode};

/// Mint a token the way the booking service would
pub fn mint(sub: &str, exp: i64) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        exp,
        iat: None,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(b"server-key")).unwrap()
}

pub fn now() -> i64 {
    Utc::now().timestamp()
}

/// A token valid for the next hour
pub fn live_token() -> String {
    mint("john_doe", now() + 3600)
}

/// Operation recorded by [`FakeBackend`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List(SlotKind),
    GetSlot(SlotId),
    Book(SlotId),
    Release(SlotId),
    GetAppointment(AppointmentId),
    Repoint(AppointmentId, SlotId),
}

/// Failure to inject into an operation
#[derive(Debug, Clone, Copy)]
pub enum Injected {
    NotFound,
    ServerError,
}

#[derive(Default)]
struct State {
    slots: HashMap<SlotId, SlotStatus>,
    appointments: HashMap<AppointmentId, SlotId>,
    calls: Vec<Call>,
    bearers: Vec<String>,
    fail_release: Option<Injected>,
    fail_repoint: Option<Injected>,
    end_session_after_booking: Option<SessionContext>,
}

/// In-memory resource-allocation service
#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<State>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_slot(self, id: i64, status: SlotStatus) -> Self {
        self.state.lock().unwrap().slots.insert(SlotId(id), status);
        self
    }

    pub fn with_appointment(self, id: i64, slot_id: i64) -> Self {
        self.state
            .lock()
            .unwrap()
            .appointments
            .insert(AppointmentId(id), SlotId(slot_id));
        self
    }

    pub fn fail_release(self, injected: Injected) -> Self {
        self.state.lock().unwrap().fail_release = Some(injected);
        self
    }

    pub fn fail_repoint(self, injected: Injected) -> Self {
        self.state.lock().unwrap().fail_repoint = Some(injected);
        self
    }

    /// Clear the session right after the next successful booking,
    /// as a logout from elsewhere in the client would
    pub fn end_session_after_booking(&self, context: SessionContext) {
        self.state.lock().unwrap().end_session_after_booking = Some(context);
    }

    pub fn slot_status(&self, id: i64) -> Option<SlotStatus> {
        self.state.lock().unwrap().slots.get(&SlotId(id)).copied()
    }

    pub fn appointment_slot(&self, id: i64) -> Option<SlotId> {
        self.state
            .lock()
            .unwrap()
            .appointments
            .get(&AppointmentId(id))
            .copied()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn bearers(&self) -> Vec<String> {
        self.state.lock().unwrap().bearers.clone()
    }

    fn record(&self, bearer: &BearerToken, call: Call) {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        state.bearers.push(bearer.as_str().to_string());
    }

    fn slot(id: SlotId, status: SlotStatus) -> Slot {
        Slot {
            id,
            date: NaiveDate::from_ymd_opt(2025, 3, 14).unwrap(),
            start_time: NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            end_time: NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            vet_id: VetId(1),
            status,
            priority: true,
        }
    }
}

fn injected_error(injected: Injected, resource: Resource) -> ClientError {
    match injected {
        Injected::NotFound => ClientError::NotFound(resource),
        Injected::ServerError => ClientError::Transport(TransportError::Status {
            status: 500,
            message: "Internal server error".to_string(),
        }),
    }
}

#[async_trait]
impl SlotTransport for FakeBackend {
    async fn list_available_slots(
        &self,
        bearer: &BearerToken,
        kind: SlotKind,
    ) -> ClientResult<Vec<Slot>> {
        self.record(bearer, Call::List(kind));
        let state = self.state.lock().unwrap();
        let mut slots: Vec<Slot> = state
            .slots
            .iter()
            .filter(|(_, status)| **status == SlotStatus::Free)
            .map(|(id, status)| Self::slot(*id, *status))
            .collect();
        slots.sort_by_key(|slot| slot.id);
        Ok(slots)
    }

    async fn get_slot(&self, bearer: &BearerToken, id: SlotId) -> ClientResult<Slot> {
        self.record(bearer, Call::GetSlot(id));
        let state = self.state.lock().unwrap();
        state
            .slots
            .get(&id)
            .map(|status| Self::slot(id, *status))
            .ok_or(ClientError::NotFound(Resource::Slot(id)))
    }

    async fn book_slot(&self, bearer: &BearerToken, id: SlotId) -> ClientResult<()> {
        self.record(bearer, Call::Book(id));
        let context = {
            let mut state = self.state.lock().unwrap();
            match state.slots.get_mut(&id) {
                None => return Err(ClientError::NotFound(Resource::Slot(id))),
                Some(SlotStatus::Booked) => return Err(ClientError::Conflict(Resource::Slot(id))),
                Some(status) => *status = SlotStatus::Booked,
            }
            state.end_session_after_booking.take()
        };

        if let Some(context) = context {
            context.end().await;
        }
        Ok(())
    }

    async fn release_slot(&self, bearer: &BearerToken, id: SlotId) -> ClientResult<()> {
        self.record(bearer, Call::Release(id));
        let mut state = self.state.lock().unwrap();
        if let Some(injected) = state.fail_release {
            return Err(injected_error(injected, Resource::Slot(id)));
        }
        match state.slots.get_mut(&id) {
            None => Err(ClientError::NotFound(Resource::Slot(id))),
            Some(status) => {
                *status = SlotStatus::Free;
                Ok(())
            }
        }
    }

    async fn get_appointment(
        &self,
        bearer: &BearerToken,
        id: AppointmentId,
    ) -> ClientResult<Appointment> {
        self.record(bearer, Call::GetAppointment(id));
        let state = self.state.lock().unwrap();
        state
            .appointments
            .get(&id)
            .map(|slot_id| Appointment {
                id,
                slot_id: *slot_id,
                pet_id: PetId(100 + id.0),
            })
            .ok_or(ClientError::NotFound(Resource::Appointment(id)))
    }

    async fn repoint_appointment(
        &self,
        bearer: &BearerToken,
        id: AppointmentId,
        slot_id: SlotId,
    ) -> ClientResult<()> {
        self.record(bearer, Call::Repoint(id, slot_id));
        let mut state = self.state.lock().unwrap();
        if let Some(injected) = state.fail_repoint {
            return Err(injected_error(injected, Resource::Appointment(id)));
        }
        if !state.slots.contains_key(&slot_id) {
            return Err(ClientError::NotFound(Resource::Slot(slot_id)));
        }
        match state.appointments.get_mut(&id) {
            None => Err(ClientError::NotFound(Resource::Appointment(id))),
            Some(current) => {
                *current = slot_id;
                Ok(())
            }
        }
    }
}

/// Login surface recording every redirect
#[derive(Default)]
pub struct RecordingSurface {
    redirects: Mutex<Vec<DenialReason>>,
}

impl RecordingSurface {
    pub fn redirects(&self) -> Vec<DenialReason> {
        self.redirects.lock().unwrap().clone()
    }
}

impl LoginSurface for RecordingSurface {
    fn redirect_to_login(&self, reason: DenialReason) {
        self.redirects.lock().unwrap().push(reason);
    }
}

/// A slot client over a fake backend with observable session state
pub struct Harness {
    pub client: SlotClient<FakeBackend>,
    pub backend: FakeBackend,
    pub context: SessionContext,
    pub vault: Arc<MemoryVault>,
    pub surface: Arc<RecordingSurface>,
}

impl Harness {
    /// Harness with an empty vault and, if given, `token` as the live session
    pub async fn new(backend: FakeBackend, token: Option<&str>) -> Self {
        Self::with_vault(backend, token, MemoryVault::new()).await
    }

    pub async fn with_vault(backend: FakeBackend, token: Option<&str>, vault: MemoryVault) -> Self {
        let vault = Arc::new(vault);
        let context = SessionContext::new(vault.clone());
        if let Some(token) = token {
            context.establish(token).await.unwrap();
        }

        let surface = Arc::new(RecordingSurface::default());
        let gate = SessionGate::new(context.clone(), surface.clone());
        let client = SlotClient::new(gate, backend.clone());

        Self {
            client,
            backend,
            context,
            vault,
            surface,
        }
    }
}
