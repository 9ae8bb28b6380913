//! `vaxdrive` server entry point: settings, persistence, and the HTTP server.

mod server;

use std::path::Path;

use actix_web::cookie::{Key, SameSite};
use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, create_server};
use vaxdrive::inbound::http::health::HealthState;
use vaxdrive::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use vaxdrive::settings::AppSettings;

fn init_tracing() {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }
}

fn load_session_key(path: &Path, allow_ephemeral: bool) -> Result<Key> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(e) if cfg!(debug_assertions) || allow_ephemeral => {
            warn!(path = %path.display(), error = %e, "using temporary session key (dev only)");
            Ok(Key::generate())
        }
        Err(e) => Err(eyre!("failed to read session key at {}: {e}", path.display())),
    }
}

async fn connect_database(settings: &AppSettings, url: &str) -> Result<DbPool> {
    run_pending_migrations(url)
        .await
        .wrap_err("failed to apply database migrations")?;
    let config = PoolConfig::new(url).with_max_size(settings.pool_max_size());
    DbPool::new(config)
        .await
        .map_err(|err| eyre!("failed to build database pool: {}", err.into_message()))
}

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .wrap_err("failed to load settings")?;
    let key = load_session_key(
        settings.session_key_file(),
        settings.allow_ephemeral_session_key,
    )?;

    let mut config = ServerConfig::new(
        key,
        settings.cookie_secure(),
        SameSite::Lax,
        settings.bind_addr()?,
    )
    .with_assignment_concurrency(settings.assignment_concurrency())
    .with_authority_account(settings.authority_account()?);
    if let Some(url) = settings.database_url() {
        config = config.with_db_pool(connect_database(&settings, url).await?);
    }
    if let Some(relay) = settings.mail_relay_url()? {
        config = config.with_mail_relay(relay, settings.mail_timeout());
    }

    info!(addr = %config.bind_addr(), "starting vaxdrive server");
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config).wrap_err("failed to start server")?;
    server.await.wrap_err("server terminated with an error")
}
