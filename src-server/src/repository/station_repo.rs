//! Station Repository
//!
//! SQLite-backed CRUD for stations.

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use crate::domain::{DomainError, DomainResult, Station};
use super::db::{not_initialized, SharedConnection};
use super::traits::Repository;

pub struct StationRepository {
    conn: SharedConnection,
}

impl StationRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }
}

pub(crate) fn station_exists(conn: &Connection, id: u32) -> DomainResult<bool> {
    let found = conn
        .query_row("SELECT 1 FROM stations WHERE id = ?1", params![id], |_| Ok(()))
        .optional()?;
    Ok(found.is_some())
}

#[async_trait]
impl Repository<Station> for StationRepository {
    async fn create(&self, entity: &Station) -> DomainResult<Station> {
        let name = entity.name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidInput("Station name is empty".to_string()));
        }
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        conn.execute("INSERT INTO stations (name) VALUES (?1)", params![name])?;
        Ok(Station::new(conn.last_insert_rowid() as u32, name.to_string()))
    }

    async fn find_by_id(&self, id: u32) -> DomainResult<Option<Station>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let station = conn
            .query_row("SELECT id, name FROM stations WHERE id = ?1", params![id], |row| {
                Ok(Station::new(row.get(0)?, row.get(1)?))
            })
            .optional()?;
        Ok(station)
    }

    async fn list(&self) -> DomainResult<Vec<Station>> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let mut stmt = conn.prepare("SELECT id, name FROM stations ORDER BY id")?;
        let stations = stmt
            .query_map([], |row| Ok(Station::new(row.get(0)?, row.get(1)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(stations)
    }

    async fn update(&self, entity: &Station) -> DomainResult<Station> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        let changed = conn.execute(
            "UPDATE stations SET name = ?1 WHERE id = ?2",
            params![entity.name.trim(), entity.id],
        )?;
        if changed == 0 {
            return Err(DomainError::NotFound(format!("Station {}", entity.id)));
        }
        Ok(entity.clone())
    }

    async fn delete(&self, id: u32) -> DomainResult<()> {
        let guard = self.conn.lock().await;
        let conn = guard.as_ref().ok_or_else(not_initialized)?;

        // Queue items go with it (ON DELETE CASCADE)
        conn.execute("DELETE FROM stations WHERE id = ?1", params![id])?;
        Ok(())
    }
}
