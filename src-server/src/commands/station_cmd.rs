//! Station Commands

use log::info;

use crate::domain::{DomainResult, Station};
use crate::repository::Repository;
use crate::AppState;

/// List all stations
pub async fn list_stations(state: &AppState) -> DomainResult<Vec<Station>> {
    state.station_repo.list().await
}

/// Create a new station with an empty queue
pub async fn create_station(state: &AppState, name: String) -> DomainResult<Station> {
    let station = state.station_repo.create(&Station::new(0, name)).await?;
    info!("Created station {} ({})", station.id, station.name);
    Ok(station)
}

/// Create a first station when the database is empty
pub async fn ensure_default_station(state: &AppState, name: &str) -> DomainResult<()> {
    if state.station_repo.list().await?.is_empty() {
        create_station(state, name.to_string()).await?;
    }
    Ok(())
}
