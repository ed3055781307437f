//! Queue Ranking Operations
//!
//! Reading a station's queue in order and applying client rank updates.

use std::collections::HashSet;

use async_trait::async_trait;
use log::{info, warn};
use reorder::{ranks, RankAssignment};
use rusqlite::params;

use crate::domain::{DomainError, DomainResult, QueueItem};
use crate::repository::db::not_initialized;
use crate::repository::station_repo::station_exists;
use super::queue_repo::{reindex, station_items, QueueRepository};

/// Trait for rank operations on a station queue
#[async_trait]
pub trait QueueRankingOperations {
    /// Items of a station in rank order
    async fn list_by_station(&self, station_id: u32) -> DomainResult<Vec<QueueItem>>;

    /// Rewrite ranks to 1..N keeping the current order
    async fn reindex_station(&self, station_id: u32) -> DomainResult<()>;

    /// Apply a partial rank assignment atomically.
    ///
    /// The resulting ranks of the whole station must be exactly 1..N,
    /// otherwise nothing is written and `Conflict` is returned.
    async fn apply_ranks(&self, station_id: u32, assignments: &[RankAssignment]) -> DomainResult<Vec<QueueItem>>;
}

fn validate_assignments(assignments: &[RankAssignment]) -> DomainResult<()> {
    if assignments.is_empty() {
        return Err(DomainError::InvalidInput("Empty rank update".to_string()));
    }
    let mut seen = HashSet::new();
    for assignment in assignments {
        if assignment.rank == 0 {
            return Err(DomainError::InvalidInput(format!("Rank of item {} must be >= 1", assignment.id)));
        }
        if !seen.insert(assignment.id) {
            return Err(DomainError::InvalidInput(format!("Item {} listed twice", assignment.id)));
        }
    }
    Ok(())
}

#[async_trait]
impl QueueRankingOperations for QueueRepository {
    async fn list_by_station(&self, station_id: u32) -> DomainResult<Vec<QueueItem>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        if !station_exists(conn, station_id)? {
            return Err(DomainError::NotFound(format!("Station {}", station_id)));
        }
        station_items(conn, station_id)
    }

    async fn reindex_station(&self, station_id: u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        reindex(conn, station_id)
    }

    async fn apply_ranks(&self, station_id: u32, assignments: &[RankAssignment]) -> DomainResult<Vec<QueueItem>> {
        validate_assignments(assignments)?;

        let mut guard = self.conn.lock().await;
        let conn = guard.as_mut().ok_or_else(not_initialized)?;

        if !station_exists(conn, station_id)? {
            return Err(DomainError::NotFound(format!("Station {}", station_id)));
        }

        // Dropping the transaction without commit rolls everything back
        let tx = conn.transaction()?;
        let now = chrono::Utc::now().timestamp_millis();
        for assignment in assignments {
            let changed = tx.execute(
                "UPDATE queue_items SET rank = ?1, updated_at = ?2 WHERE id = ?3 AND station_id = ?4",
                params![assignment.rank, now, assignment.id, station_id],
            )?;
            if changed == 0 {
                return Err(DomainError::NotFound(format!(
                    "Queue item {} at station {}",
                    assignment.id, station_id
                )));
            }
        }

        let stored: Vec<u32> = {
            let mut stmt = tx.prepare("SELECT rank FROM queue_items WHERE station_id = ?1")?;
            let rows = stmt.query_map(params![station_id], |row| row.get::<_, u32>(0))?;
            rows.collect::<Result<Vec<_>, _>>()?
        };
        if !ranks::is_dense(stored.iter().copied()) {
            warn!(
                "Rejected rank update for station {}: {} assignments leave ranks non-contiguous",
                station_id,
                assignments.len()
            );
            return Err(DomainError::Conflict(format!(
                "Ranks of station {} changed since they were loaded",
                station_id
            )));
        }
        tx.commit()?;

        info!("Station {}: applied {} rank updates", station_id, assignments.len());
        station_items(conn, station_id)
    }
}
