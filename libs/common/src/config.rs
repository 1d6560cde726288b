//! Client configuration
//!
//! Values come from built-in defaults overlaid with `VETCLINIC_*` environment
//! variables.

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};

/// Prefix of every environment variable read by [`ClientConfig::from_env`]
pub const ENV_PREFIX: &str = "VETCLINIC";

/// Configuration shared by the auth and booking clients
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the booking service API (e.g. "http://localhost:8080/api")
    pub api_url: String,
    /// Route of the login surface users are sent to when their session ends
    pub login_route: String,
    /// Redis URL for the durable token vault; in-memory vault when unset
    pub redis_url: Option<String>,
    /// Key the token is stored under in the durable vault
    pub vault_key: String,
    /// Username used by the command-line client to log in
    pub username: Option<String>,
    /// Password used by the command-line client to log in
    pub password: Option<String>,
}

impl ClientConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variables
    /// - `VETCLINIC_API_URL`: booking API base URL (default: "http://localhost:8080/api")
    /// - `VETCLINIC_LOGIN_ROUTE`: login surface route (default: "/login")
    /// - `VETCLINIC_REDIS_URL`: Redis URL for the token vault (default: unset)
    /// - `VETCLINIC_VAULT_KEY`: vault key (default: "vetclinic:token")
    /// - `VETCLINIC_USERNAME` / `VETCLINIC_PASSWORD`: login credentials (default: unset)
    pub fn from_env() -> ConfigResult<Self> {
        let config = Config::builder()
            .set_default("api_url", "http://localhost:8080/api")?
            .set_default("login_route", "/login")?
            .set_default("vault_key", "vetclinic:token")?
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?;

        let mut client: ClientConfig = config.try_deserialize()?;
        client.normalize()?;
        Ok(client)
    }

    fn normalize(&mut self) -> ConfigResult<()> {
        let trimmed = self.api_url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ConfigError::Invalid {
                key: "api_url",
                reason: "must not be empty".to_string(),
            });
        }
        self.api_url = trimmed.to_string();

        // Blank values coming from the environment mean "unset"
        for value in [&mut self.redis_url, &mut self.username, &mut self.password] {
            if value.as_deref().is_some_and(|v| v.trim().is_empty()) {
                *value = None;
            }
        }

        Ok(())
    }
}
