use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{EntityType, Payload, SnapshotRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("corrupt payload for {entity}/{key}: {source}")]
    Corrupt {
        entity: EntityType,
        key: String,
        source: serde_json::Error,
    },
}

/// Port for persisting the latest inventory snapshot per entity type
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Write each item under `(entity, item[key_field])`, replacing any
    /// existing record for that key. Keys not present in `items` are left
    /// untouched. Returns the number of distinct keys written.
    async fn bulk_upsert(
        &self,
        entity: EntityType,
        items: Vec<Payload>,
        key_field: &str,
    ) -> Result<usize, StoreError>;

    /// Like `bulk_upsert`, but also drops every record of `entity` whose key
    /// is absent from `items`.
    async fn replace_all(
        &self,
        entity: EntityType,
        items: Vec<Payload>,
        key_field: &str,
    ) -> Result<usize, StoreError>;

    /// All records currently stored for `entity`, in no particular order
    async fn read_all(&self, entity: EntityType) -> Result<Vec<SnapshotRecord>, StoreError>;
}
