//! blind-clock server entry point.
//!
//! Restores persisted clocks, starts the tick driver and persistence
//! sweep, then serves the REST and WebSocket endpoints until Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::EnvFilter;

use blind_clock::app_state::AppState;
use blind_clock::config::{ClockConfig, LogFormat};
use blind_clock::domain::{EventBus, TimerStore};
use blind_clock::persistence::{
    InMemoryTimerRepository, PersistenceGateway, PostgresTimerRepository, TimerRepository,
};
use blind_clock::server::build_app;
use blind_clock::service::{
    TimerService, recover_timers, spawn_persistence_sweep, spawn_tick_driver,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = ClockConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Json => tracing_subscriber::fmt().json().with_env_filter(filter).init(),
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
    }
    tracing::info!(addr = %config.listen_addr, "starting blind-clock");

    // Build persistence layer
    let repository = connect_repository(&config).await?;
    let persistence = PersistenceGateway::new(repository);

    // Build domain and service layers
    let event_bus = EventBus::new(config.event_bus_capacity);
    let timer_service = Arc::new(TimerService::new(
        Arc::new(TimerStore::new()),
        persistence,
        event_bus,
        config.max_set_time_seconds,
    ));

    // Restore clocks before anyone can connect
    match recover_timers(&timer_service).await {
        Ok(report) if !report.failed.is_empty() => {
            tracing::warn!(failed = ?report.failed, "some timers could not be recovered");
        }
        Ok(_) => {}
        Err(e) => tracing::error!(error = %e, "timer recovery skipped"),
    }

    // Background drivers
    let ticker = spawn_tick_driver(Arc::clone(&timer_service), config.tick_interval());
    let sweeper = spawn_persistence_sweep(Arc::clone(&timer_service), config.sweep_interval());

    // Build router
    let app = build_app(AppState::new(Arc::clone(&timer_service)));

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Flush every clock before exiting
    ticker.abort();
    sweeper.abort();
    let report = timer_service.persist_all().await;
    tracing::info!(saved = report.saved, failed = report.failed, "shutdown flush complete");

    Ok(())
}

async fn connect_repository(config: &ClockConfig) -> anyhow::Result<Arc<dyn TimerRepository>> {
    if !config.persistence_enabled {
        tracing::warn!("persistence disabled; clocks will not survive a restart");
        return Ok(Arc::new(InMemoryTimerRepository::new()));
    }

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await
        .context("failed to connect to PostgreSQL")?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run migrations")?;
    tracing::info!("database ready");

    Ok(Arc::new(PostgresTimerRepository::new(pool)))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
