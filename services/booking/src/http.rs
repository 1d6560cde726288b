//! HTTP transport for the resource-allocation service

use async_trait::async_trait;
use auth::{ApiErrorResponse, BearerToken};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use tracing::{debug, warn};

use crate::{
    error::{ClientError, ClientResult, Resource, TransportError},
    models::{Appointment, AppointmentId, Slot, SlotId, SlotKind},
    transport::SlotTransport,
};

/// reqwest-backed [`SlotTransport`]
#[derive(Clone)]
pub struct HttpTransport {
    http: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for the API at `base_url` (e.g. "http://localhost:8080/api")
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn send(
        &self,
        request: RequestBuilder,
        bearer: &BearerToken,
        resource: Resource,
    ) -> ClientResult<Response> {
        let response = request.bearer_auth(bearer.as_str()).send().await?;
        let status = response.status();
        debug!(%status, %resource, "Booking service responded");

        if status.is_success() {
            return Ok(response);
        }

        let message = ApiErrorResponse::message_of(response.text().await.unwrap_or_default());
        warn!(status = status.as_u16(), %resource, "Booking service rejected request: {}", message);

        Err(match status {
            StatusCode::CONFLICT => ClientError::Conflict(resource),
            StatusCode::NOT_FOUND => ClientError::NotFound(resource),
            _ => TransportError::Status {
                status: status.as_u16(),
                message,
            }
            .into(),
        })
    }
}

#[async_trait]
impl SlotTransport for HttpTransport {
    async fn list_available_slots(
        &self,
        bearer: &BearerToken,
        kind: SlotKind,
    ) -> ClientResult<Vec<Slot>> {
        let path = match kind {
            SlotKind::Priority => "/slots/available-priority-slots",
            SlotKind::Regular => "/slots/available-slots",
        };
        let response = self
            .send(self.http.get(self.url(path)), bearer, Resource::Listing)
            .await?;
        Ok(response.json().await?)
    }

    async fn get_slot(&self, bearer: &BearerToken, id: SlotId) -> ClientResult<Slot> {
        let response = self
            .send(
                self.http.get(self.url(&format!("/slots/{}", id.0))),
                bearer,
                Resource::Slot(id),
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn book_slot(&self, bearer: &BearerToken, id: SlotId) -> ClientResult<()> {
        self.send(
            self.http.put(self.url(&format!("/slots/book-slot/{}", id.0))),
            bearer,
            Resource::Slot(id),
        )
        .await?;
        Ok(())
    }

    async fn release_slot(&self, bearer: &BearerToken, id: SlotId) -> ClientResult<()> {
        self.send(
            self.http.put(self.url(&format!("/slots/release-slot/{}", id.0))),
            bearer,
            Resource::Slot(id),
        )
        .await?;
        Ok(())
    }

    async fn get_appointment(
        &self,
        bearer: &BearerToken,
        id: AppointmentId,
    ) -> ClientResult<Appointment> {
        let response = self
            .send(
                self.http
                    .get(self.url(&format!("/appointments/appointment/{}", id.0))),
                bearer,
                Resource::Appointment(id),
            )
            .await?;
        Ok(response.json().await?)
    }

    async fn repoint_appointment(
        &self,
        bearer: &BearerToken,
        id: AppointmentId,
        slot_id: SlotId,
    ) -> ClientResult<()> {
        self.send(
            self.http
                .put(self.url(&format!("/appointments/update-appointment/{}", id.0)))
                .query(&[("slotId", slot_id.0)]),
            bearer,
            Resource::Appointment(id),
        )
        .await?;
        Ok(())
    }
}
