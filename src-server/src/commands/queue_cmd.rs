//! Queue Commands
//!
//! Fetching a station queue, adding/removing jobs and applying reorders.

use log::{info, warn};
use reorder::{OrderedItem, RankAssignment};

use crate::domain::{DomainError, DomainResult, QueueItem};
use crate::repository::{QueueRankingOperations, Repository};
use crate::AppState;

/// Station queue in rank order
pub async fn list_queue(state: &AppState, station_id: u32) -> DomainResult<Vec<OrderedItem>> {
    let items = state.queue_repo.list_by_station(station_id).await?;
    Ok(items.iter().map(QueueItem::to_ordered).collect())
}

/// Append a job to the end of a station queue
pub async fn create_queue_item(
    state: &AppState,
    station_id: u32,
    label: String,
    dimensions: Option<String>,
    species: Option<String>,
) -> DomainResult<OrderedItem> {
    let mut item = QueueItem::new(station_id, label);
    item.dimensions = dimensions.filter(|d| !d.trim().is_empty());
    item.species = species.filter(|s| !s.trim().is_empty());

    let created = state.queue_repo.create(&item).await?;
    info!("Station {}: queued item {} at rank {}", station_id, created.id, created.rank);
    Ok(created.to_ordered())
}

/// Remove a job; the remaining ranks stay contiguous
pub async fn delete_queue_item(state: &AppState, id: u32) -> DomainResult<()> {
    let item = state.queue_repo.get(id).await?;
    state.queue_repo.delete(id).await?;
    info!("Station {}: removed item {} ({})", item.station_id, id, item.label);
    Ok(())
}

/// Apply a client reorder; all or nothing
pub async fn submit_ranks(
    state: &AppState,
    station_id: u32,
    ranks: Vec<RankAssignment>,
) -> DomainResult<Vec<OrderedItem>> {
    match state.queue_repo.apply_ranks(station_id, &ranks).await {
        Ok(items) => Ok(items.iter().map(QueueItem::to_ordered).collect()),
        Err(err) => {
            if !matches!(err, DomainError::Internal(_)) {
                warn!("Station {}: rank update refused: {}", station_id, err);
            }
            Err(err)
        }
    }
}

/// Close rank gaps left by edits made outside the server; run at startup
pub async fn repair_ranks(state: &AppState) -> DomainResult<()> {
    for station in state.station_repo.list().await? {
        state.queue_repo.reindex_station(station.id).await?;
    }
    info!("Ranks checked for all stations");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{create_station, ensure_default_station, list_stations};
    use crate::repository::init_db;
    use std::path::PathBuf;

    async fn setup_state() -> AppState {
        let db = init_db(&PathBuf::from(":memory:")).await.expect("Failed to init test DB");
        AppState::new(&db)
    }

    #[tokio::test]
    async fn test_submit_then_fetch_round_trip() {
        let state = setup_state().await;
        let station = create_station(&state, "Saw".to_string()).await.unwrap();
        let a = create_queue_item(&state, station.id, "A".into(), Some("100x20".into()), None).await.unwrap();
        let b = create_queue_item(&state, station.id, "B".into(), None, Some("".into())).await.unwrap();
        assert!(b.details.is_empty());

        let after = submit_ranks(
            &state,
            station.id,
            vec![RankAssignment { id: b.id, rank: 1 }, RankAssignment { id: a.id, rank: 2 }],
        )
        .await
        .unwrap();
        assert_eq!(after, list_queue(&state, station.id).await.unwrap());
        assert_eq!(after[0].id, b.id);
        assert_eq!(after[1].details.get("dimensions").map(String::as_str), Some("100x20"));
    }

    #[tokio::test]
    async fn test_submit_stale_ranks_is_conflict() {
        let state = setup_state().await;
        let station = create_station(&state, "Saw".to_string()).await.unwrap();
        let a = create_queue_item(&state, station.id, "A".into(), None, None).await.unwrap();
        create_queue_item(&state, station.id, "B".into(), None, None).await.unwrap();

        let err = submit_ranks(&state, station.id, vec![RankAssignment { id: a.id, rank: 2 }])
            .await
            .unwrap_err();
        assert_eq!(err.code(), "conflict");
    }

    #[tokio::test]
    async fn test_default_station_created_once() {
        let state = setup_state().await;
        ensure_default_station(&state, "Main").await.unwrap();
        ensure_default_station(&state, "Main").await.unwrap();
        let stations = list_stations(&state).await.unwrap();
        assert_eq!(stations.len(), 1);
        assert_eq!(stations[0].name, "Main");
    }

    #[tokio::test]
    async fn test_delete_unknown_item_is_not_found() {
        let state = setup_state().await;
        let err = delete_queue_item(&state, 5).await.unwrap_err();
        assert_eq!(err.code(), "not_found");
    }

    #[tokio::test]
    async fn test_repair_ranks_closes_gaps() {
        let db = init_db(&PathBuf::from(":memory:")).await.expect("Failed to init test DB");
        let state = AppState::new(&db);
        let station = create_station(&state, "Saw".to_string()).await.unwrap();
        let a = create_queue_item(&state, station.id, "A".into(), None, None).await.unwrap();
        create_queue_item(&state, station.id, "B".into(), None, None).await.unwrap();
        {
            let guard = db.conn.lock().await;
            guard
                .as_ref()
                .unwrap()
                .execute("UPDATE queue_items SET rank = 7 WHERE id = ?1", [a.id])
                .unwrap();
        }

        repair_ranks(&state).await.unwrap();
        let items = list_queue(&state, station.id).await.unwrap();
        let order: Vec<(&str, u32)> = items.iter().map(|i| (i.label.as_str(), i.rank)).collect();
        assert_eq!(order, vec![("B", 1), ("A", 2)]);
    }
}
