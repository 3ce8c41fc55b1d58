//! Backend entry-point: loads settings, prepares storage and serves the API.

mod server;

use std::time::Duration;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tokio::signal;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use inventory_backend::inbound::http::health::HealthState;
use inventory_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use inventory_backend::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
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

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let bind_addr = settings.bind_addr()?;
    let mut config = ServerConfig::new(bind_addr, settings.jwt_secret()?)
        .with_hashing(settings.hashing_params())
        .with_shutdown_timeout(Duration::from_secs(settings.shutdown_timeout_secs));

    match settings.database_url() {
        Some(url) => {
            run_pending_migrations(url)
                .await
                .wrap_err("failed to apply database migrations")?;
            let pool = DbPool::connect(
                PoolConfig::new(url).with_max_size(settings.db_max_connections()),
            )
            .await
            .wrap_err("failed to connect to the database")?;
            config = config.with_db_pool(pool);
        }
        None => warn!("no database_url configured; using in-memory stores"),
    }

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let handle = server.handle();
    info!(%bind_addr, "listening");

    actix_web::rt::spawn(async move {
        wait_for_shutdown().await;
        health_state.mark_unhealthy();
        handle.stop(true).await;
    });

    server.await.wrap_err("server terminated with an error")
}

/// Resolve on Ctrl+C or SIGTERM.
async fn wait_for_shutdown() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut handler) => {
                handler.recv().await;
            }
            Err(e) => {
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received Ctrl+C"),
        () = terminate => info!("received SIGTERM"),
    }
    info!("shutdown signal received, draining connections");
}
