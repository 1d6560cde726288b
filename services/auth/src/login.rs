//! Login and registration against the booking service
//!
//! Both endpoints answer with a freshly issued token. The token is decoded and
//! stored through the [`SessionContext`], which makes it the live session.
//! These calls carry no credential and therefore bypass the guard.

use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::{
    context::SessionContext,
    error::{ApiErrorResponse, LoginError},
    store::Session,
};

/// Request for user login
#[derive(Debug, Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Request for user registration
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub phone_number: String,
    pub name: String,
    pub surname: String,
}

/// Response for successful login or registration
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthenticationSucceeded {
    token: String,
    #[serde(default)]
    expires_in: Option<i64>,
}

/// Client for the unauthenticated user endpoints
#[derive(Clone)]
pub struct AuthClient {
    http: Client,
    base_url: String,
    context: SessionContext,
}

impl AuthClient {
    /// Create a client for the API at `base_url`
    pub fn new(http: Client, base_url: impl Into<String>, context: SessionContext) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            context,
        }
    }

    /// Log in and make the issued token the live session
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, LoginError> {
        info!("Login attempt for user: {}", username);

        let response = self
            .http
            .post(format!("{}/users/login", self.base_url))
            .json(&LoginRequest { username, password })
            .send()
            .await?;

        self.accept(response).await
    }

    /// Register a new owner account and make the issued token the live session
    pub async fn register(&self, request: &RegisterRequest) -> Result<Session, LoginError> {
        info!("Registration attempt for user: {}", request.username);

        let response = self
            .http
            .post(format!("{}/users/register", self.base_url))
            .json(request)
            .send()
            .await?;

        self.accept(response).await
    }

    /// Log out locally
    pub async fn logout(&self) {
        self.context.end().await;
    }

    async fn accept(&self, response: Response) -> Result<Session, LoginError> {
        let status = response.status();
        if !status.is_success() {
            let message = ApiErrorResponse::message_of(response.text().await.unwrap_or_default());
            error!(status = status.as_u16(), "Authentication rejected: {}", message);
            return Err(LoginError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let payload: AuthenticationSucceeded = response.json().await?;
        let session = self.context.establish(&payload.token).await?;
        info!(
            subject = %session.subject_id(),
            expires_in = ?payload.expires_in,
            "Authenticated"
        );
        Ok(session)
    }
}
