mod checkins;
mod clock;
mod config;
mod customers;
mod db;
mod errors;
mod models;
mod reminders;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::clock::SystemClock;
use crate::config::Config;
use crate::db::{create_pool, run_migrations};
use crate::reminders::source::PgSnapshotSource;
use crate::reminders::ReminderEngine;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing DATABASE_URL or bad reminder settings)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting gym membership API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let db = create_pool(&config.database_url).await?;
    run_migrations(&db).await?;

    let engine = ReminderEngine::new(config.reminders);
    info!(
        "Reminder settings: UTC{:+}, absence > {} days, expiry window {} days",
        engine.settings().utc_offset_hours(),
        engine.settings().absence_threshold_days(),
        engine.settings().expiry_window_days()
    );

    // Build app state
    let state = AppState {
        db: db.clone(),
        clock: Arc::new(SystemClock),
        snapshots: Arc::new(PgSnapshotSource::new(db)),
        engine,
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
