//! Queue Repository - Core CRUD Operations
//!
//! SQLite-backed implementation for queue items.
//! Rank management lives in `queue_ranking`.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{DomainError, DomainResult, QueueItem};
use crate::repository::db::{not_initialized, SharedConnection};
use crate::repository::station_repo::station_exists;
use crate::repository::traits::Repository;

const QUEUE_COLUMNS: &str = "id, station_id, rank, label, dimensions, species, created_at, updated_at";

/// SQLite implementation of the queue repository
pub struct QueueRepository {
    pub(super) conn: SharedConnection,
}

impl QueueRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

#[async_trait]
impl Repository<QueueItem> for QueueRepository {
    /// Insert at the end of the station's queue
    async fn create(&self, entity: &QueueItem) -> DomainResult<QueueItem> {
        let label = entity.label.trim();
        if label.is_empty() {
            return Err(DomainError::InvalidInput("Queue item label is empty".to_string()));
        }
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        if !station_exists(conn, entity.station_id)? {
            return Err(DomainError::NotFound(format!("Station {}", entity.station_id)));
        }
        let rank = next_rank(conn, entity.station_id)?;
        let now = chrono::Utc::now().timestamp_millis();

        conn.execute(
            "INSERT INTO queue_items (station_id, rank, label, dimensions, species, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?6)",
            params![entity.station_id, rank, label, entity.dimensions, entity.species, now],
        )?;

        Ok(QueueItem {
            id: conn.last_insert_rowid() as u32,
            rank,
            label: label.to_string(),
            created_at: Some(now),
            updated_at: Some(now),
            ..entity.clone()
        })
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<QueueItem>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;
        find_item(conn, id)
    }

    async fn list(&self) -> DomainResult<Vec<QueueItem>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM queue_items ORDER BY station_id, rank, id",
            QUEUE_COLUMNS
        ))?;
        let items = stmt
            .query_map([], row_to_queue_item)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    /// Updates the display payload. Ranks only change through `apply_ranks`.
    async fn update(&self, entity: &QueueItem) -> DomainResult<QueueItem> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute(
            "UPDATE queue_items SET label = ?1, dimensions = ?2, species = ?3, updated_at = ?4 WHERE id = ?5",
            params![
                entity.label,
                entity.dimensions,
                entity.species,
                chrono::Utc::now().timestamp_millis(),
                entity.id
            ],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Queue item {}", entity.id)));
        }
        find_item(conn, entity.id)?.ok_or_else(|| DomainError::NotFound(format!("Queue item {}", entity.id)))
    }

    /// Remove and close the gap in the station's ranks
    async fn delete(&self, id: u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let item = find_item(conn, id)?.ok_or_else(|| DomainError::NotFound(format!("Queue item {}", id)))?;
        conn.execute("DELETE FROM queue_items WHERE id = ?1", params![id])?;
        reindex(conn, item.station_id)
    }
}

/// Convert a database row to QueueItem
pub(super) fn row_to_queue_item(row: &rusqlite::Row) -> rusqlite::Result<QueueItem> {
    Ok(QueueItem {
        id: row.get(0)?,
        station_id: row.get(1)?,
        rank: row.get(2)?,
        label: row.get(3)?,
        dimensions: row.get(4)?,
        species: row.get(5)?,
        created_at: row.get(6)?,
        updated_at: row.get(7)?,
    })
}

pub(super) fn find_item(conn: &Connection, id: u32) -> DomainResult<Option<QueueItem>> {
    let item = conn
        .query_row(
            &format!("SELECT {} FROM queue_items WHERE id = ?1", QUEUE_COLUMNS),
            params![id],
            row_to_queue_item,
        )
        .optional()?;
    Ok(item)
}

/// Items of one station in rank order
pub(super) fn station_items(conn: &Connection, station_id: u32) -> DomainResult<Vec<QueueItem>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {} FROM queue_items WHERE station_id = ?1 ORDER BY rank, id",
        QUEUE_COLUMNS
    ))?;
    let items = stmt
        .query_map(params![station_id], row_to_queue_item)?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(items)
}

pub(super) fn next_rank(conn: &Connection, station_id: u32) -> DomainResult<u32> {
    let rank = conn.query_row(
        "SELECT COALESCE(MAX(rank), 0) + 1 FROM queue_items WHERE station_id = ?1",
        params![station_id],
        |row| row.get::<_, u32>(0),
    )?;
    Ok(rank)
}

/// Rewrite ranks of a station to 1..N keeping the current order
pub(super) fn reindex(conn: &Connection, station_id: u32) -> DomainResult<()> {
    let ids: Vec<u32> = {
        let mut stmt = conn.prepare("SELECT id FROM queue_items WHERE station_id = ?1 ORDER BY rank, id")?;
        let rows = stmt.query_map(params![station_id], |row| row.get::<_, u32>(0))?;
        rows.collect::<Result<Vec<_>, _>>()?
    };

    let now = chrono::Utc::now().timestamp_millis();
    for (idx, id) in ids.iter().enumerate() {
        conn.execute(
            "UPDATE queue_items SET rank = ?1, updated_at = ?2 WHERE id = ?3 AND rank != ?1",
            params![idx as u32 + 1, now, *id],
        )?;
    }
    Ok(())
}
