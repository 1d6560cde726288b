use std::sync::Arc;

use anyhow::{Context, Result, bail};
use auth::{AuthClient, SessionContext, SessionGate, TracingLoginSurface};
use booking::{AppointmentId, HttpTransport, Phase, SagaRun, SlotClient, SlotId};
use common::{ClientConfig, MemoryVault, RedisVault, TokenVault};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

const USAGE: &str = "usage: booking [slots | reassign <appointment_id> <new_slot_id>]";

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    info!("Starting booking client");

    let config = ClientConfig::from_env()?;

    // Durable side-store for the session token
    let vault: Arc<dyn TokenVault> = match &config.redis_url {
        Some(url) => {
            let vault = RedisVault::open(url, config.vault_key.clone())?;

            // Check vault connectivity
            if vault.health_check().await? {
                info!("Token vault connection successful");
            } else {
                bail!("Failed to connect to token vault");
            }
            Arc::new(vault)
        }
        None => {
            warn!("No Redis URL configured, the session will not survive a restart");
            Arc::new(MemoryVault::new())
        }
    };
    let context = SessionContext::new(vault);
    let http = reqwest::Client::new();

    if let (Some(username), Some(password)) = (&config.username, &config.password) {
        AuthClient::new(http.clone(), config.api_url.clone(), context.clone())
            .login(username, password)
            .await
            .context("login failed")?;
    }

    let gate = SessionGate::new(
        context,
        Arc::new(TracingLoginSurface::new(config.login_route.clone())),
    );
    let client = SlotClient::new(gate, HttpTransport::new(http, config.api_url.clone()));

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        [] | ["slots"] => list_slots(&client).await,
        ["reassign", appointment_id, new_slot_id] => {
            let appointment_id = AppointmentId(appointment_id.parse().context(USAGE)?);
            let new_slot_id = SlotId(new_slot_id.parse().context(USAGE)?);
            reassign(&client, appointment_id, new_slot_id).await
        }
        _ => bail!(USAGE),
    }
}

async fn list_slots(client: &SlotClient<HttpTransport>) -> Result<()> {
    let slots = client.list_available_slots().await?;
    if slots.is_empty() {
        println!("No available priority slots found.");
    }
    for slot in slots {
        println!("{slot}");
    }
    Ok(())
}

async fn reassign(
    client: &SlotClient<HttpTransport>,
    appointment_id: AppointmentId,
    new_slot_id: SlotId,
) -> Result<()> {
    let appointment = client.get_appointment(appointment_id).await?;
    let mut run = SagaRun::open(&appointment);
    run.confirm(new_slot_id)?;

    match run.execute(client).await? {
        Phase::Committed => {
            println!("{appointment_id} moved from {} to {new_slot_id}", appointment.slot_id);
            Ok(())
        }
        Phase::Failed(failure) => {
            if failure.cause.ended_session() {
                bail!("{failure}; log in again and retry");
            }
            bail!(
                "{failure}; state left behind: {}. Retry the whole reassignment.",
                failure.partial_state()
            )
        }
        phase => bail!("reassignment stopped in unexpected phase {phase:?}"),
    }
}
