//! Backend entry-point: loads settings, wires adapters, and serves HTTP.

mod server;

use std::sync::Arc;

use actix_web::web;
use color_eyre::eyre::{Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::config::AppSettings;
use backend::inbound::http::health::HealthState;
use backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use backend::outbound::twilio::TwilioNotifier;
use server::{ServerConfig, create_server};

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let bind_addr = settings.bind_addr()?;
    let mut config = ServerConfig::new(bind_addr);

    if let Some(url) = settings.database_url() {
        run_pending_migrations(url).await?;
        let pool = DbPool::new(
            PoolConfig::new(url).with_max_size(settings.db_max_connections()),
        )
        .await?;
        config = config.with_db_pool(pool);
    }

    match settings.twilio_credentials()? {
        Some(credentials) => {
            let notifier = TwilioNotifier::new(
                settings.twilio_api_base(),
                credentials,
                settings.notify_timeout(),
            )?;
            config = config.with_notifier(Arc::new(notifier));
        }
        None => warn!("Twilio credentials not configured; outbound messages are only logged"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    info!(%bind_addr, "santa backend listening");
    server.await?;
    health_state.mark_unhealthy();
    Ok(())
}
