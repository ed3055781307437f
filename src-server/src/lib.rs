//! Queue Server
//!
//! Layered architecture:
//! - domain: Core entities and business rules
//! - repository: Data access abstractions and implementations
//! - commands: Handlers shared by all transports
//! - http: axum routes

use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info};

pub mod config;
pub mod http;
mod domain;
mod repository;
mod commands;

use config::Settings;
use repository::{init_db, DbState, QueueRepository, StationRepository};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub station_repo: Arc<StationRepository>,
    pub queue_repo: Arc<QueueRepository>,
}

impl AppState {
    pub fn new(db: &DbState) -> Self {
        Self {
            station_repo: Arc::new(StationRepository::new(db.connection())),
            queue_repo: Arc::new(QueueRepository::new(db.connection())),
        }
    }
}

pub async fn run(settings: Settings) -> anyhow::Result<()> {
    rolling_logger::init_logger(settings.log_dir.clone(), &settings.app_name).map_err(anyhow::Error::msg)?;
    info!("Queue server starting, database at {}", settings.database_path.display());

    let db = init_db(&settings.database_path).await.map_err(|e| {
        error!("DB init failed: {}", e);
        anyhow::Error::msg(e)
    })?;
    let state = AppState::new(&db);
    commands::ensure_default_station(&state, &settings.default_station).await?;
    commands::repair_ranks(&state).await?;

    let addr: SocketAddr = settings.bind_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);
    axum::serve(listener, http::build_router(state)).await?;
    Ok(())
}
