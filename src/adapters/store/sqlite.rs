use std::collections::HashSet;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use tracing::{debug, warn};

use crate::domain::{payload_key, EntityType, Payload, SnapshotRecord};
use crate::ports::{SnapshotStore, StoreError};

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS snapshot (
    entity_type TEXT NOT NULL,
    key TEXT NOT NULL,
    data TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    PRIMARY KEY (entity_type, key)
)";

const UPSERT: &str =
    "INSERT OR REPLACE INTO snapshot (entity_type, key, data, updated_at) VALUES (?1, ?2, ?3, ?4)";

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Backend(Box::new(err))
    }
}

impl From<tokio::task::JoinError> for StoreError {
    fn from(err: tokio::task::JoinError) -> Self {
        StoreError::Backend(Box::new(err))
    }
}

/// Single-file SQLite snapshot store.
///
/// Every call opens its own connection on the blocking pool; there is no
/// long-lived handle to share between requests.
#[derive(Debug, Clone)]
pub struct SqliteSnapshotStore {
    path: PathBuf,
}

impl SqliteSnapshotStore {
    /// Open (or create) the database file and make sure the table exists
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let store = Self { path: path.into() };
        store.connect()?;
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(conn)
    }

    fn write(
        &self,
        entity: EntityType,
        items: Vec<Payload>,
        key_field: &str,
        prune: bool,
    ) -> Result<usize, StoreError> {
        let mut conn = self.connect()?;
        let tx = conn.transaction()?;
        let updated_at = Utc::now();
        let mut written = HashSet::new();

        if prune {
            tx.execute(
                "DELETE FROM snapshot WHERE entity_type = ?1",
                params![entity.as_str()],
            )?;
        }

        {
            let mut stmt = tx.prepare(UPSERT)?;
            for payload in items {
                let Some(key) = payload_key(&payload, key_field) else {
                    warn!("Skipping {} record without '{}'", entity, key_field);
                    continue;
                };
                let data = serde_json::to_string(&payload).map_err(|source| {
                    StoreError::Corrupt {
                        entity,
                        key: key.clone(),
                        source,
                    }
                })?;
                stmt.execute(params![entity.as_str(), key, data, updated_at])?;
                written.insert(key);
            }
        }

        tx.commit()?;
        debug!("Wrote {} {} records to {}", written.len(), entity, self.path.display());
        Ok(written.len())
    }

    fn read(&self, entity: EntityType) -> Result<Vec<SnapshotRecord>, StoreError> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT key, data, updated_at FROM snapshot WHERE entity_type = ?1")?;

        let rows = stmt.query_map(params![entity.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, DateTime<Utc>>(2)?,
            ))
        })?;

        let mut records = Vec::new();
        for row in rows {
            let (key, data, updated_at) = row?;
            let payload: Payload = serde_json::from_str(&data).map_err(|source| {
                StoreError::Corrupt {
                    entity,
                    key: key.clone(),
                    source,
                }
            })?;
            records.push(SnapshotRecord {
                key,
                payload,
                updated_at,
            });
        }

        Ok(records)
    }
}

#[async_trait]
impl SnapshotStore for SqliteSnapshotStore {
    async fn bulk_upsert(
        &self,
        entity: EntityType,
        items: Vec<Payload>,
        key_field: &str,
    ) -> Result<usize, StoreError> {
        let store = self.clone();
        let key_field = key_field.to_string();
        tokio::task::spawn_blocking(move || store.write(entity, items, &key_field, false)).await?
    }

    async fn replace_all(
        &self,
        entity: EntityType,
        items: Vec<Payload>,
        key_field: &str,
    ) -> Result<usize, StoreError> {
        let store = self.clone();
        let key_field = key_field.to_string();
        tokio::task::spawn_blocking(move || store.write(entity, items, &key_field, true)).await?
    }

    async fn read_all(&self, entity: EntityType) -> Result<Vec<SnapshotRecord>, StoreError> {
        let store = self.clone();
        tokio::task::spawn_blocking(move || store.read(entity)).await?
    }
}
