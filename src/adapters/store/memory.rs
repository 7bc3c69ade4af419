use std::collections::{BTreeMap, HashMap, HashSet};

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use tracing::warn;

use crate::domain::{payload_key, EntityType, Payload, SnapshotRecord};
use crate::ports::{SnapshotStore, StoreError};

/// In-memory snapshot store keyed by entity type, then entity key
#[derive(Default)]
pub struct MemorySnapshotStore {
    snapshots: RwLock<HashMap<EntityType, BTreeMap<String, SnapshotRecord>>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn keyed(entity: EntityType, items: Vec<Payload>, key_field: &str) -> Vec<SnapshotRecord> {
        let updated_at = Utc::now();
        items
            .into_iter()
            .filter_map(|payload| match payload_key(&payload, key_field) {
                Some(key) => Some(SnapshotRecord {
                    key,
                    payload,
                    updated_at,
                }),
                None => {
                    warn!("Skipping {} record without '{}'", entity, key_field);
                    None
                }
            })
            .collect()
    }
}

#[async_trait]
impl SnapshotStore for MemorySnapshotStore {
    async fn bulk_upsert(
        &self,
        entity: EntityType,
        items: Vec<Payload>,
        key_field: &str,
    ) -> Result<usize, StoreError> {
        let records = Self::keyed(entity, items, key_field);
        let written: HashSet<String> = records.iter().map(|r| r.key.clone()).collect();

        let mut snapshots = self.snapshots.write();
        let table = snapshots.entry(entity).or_default();
        for record in records {
            table.insert(record.key.clone(), record);
        }

        Ok(written.len())
    }

    async fn replace_all(
        &self,
        entity: EntityType,
        items: Vec<Payload>,
        key_field: &str,
    ) -> Result<usize, StoreError> {
        let table: BTreeMap<String, SnapshotRecord> = Self::keyed(entity, items, key_field)
            .into_iter()
            .map(|record| (record.key.clone(), record))
            .collect();
        let written = table.len();

        self.snapshots.write().insert(entity, table);

        Ok(written)
    }

    async fn read_all(&self, entity: EntityType) -> Result<Vec<SnapshotRecord>, StoreError> {
        Ok(self
            .snapshots
            .read()
            .get(&entity)
            .map(|table| table.values().cloned().collect())
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn items(values: serde_json::Value) -> Vec<Payload> {
        values
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_object().cloned().unwrap())
            .collect()
    }

    #[tokio::test]
    async fn test_last_write_wins() {
        let store = MemorySnapshotStore::new();
        store
            .bulk_upsert(EntityType::Hosts, items(json!([{"name": "h1", "cpu": 4}])), "name")
            .await
            .unwrap();
        store
            .bulk_upsert(EntityType::Hosts, items(json!([{"name": "h1", "cpu": 8}])), "name")
            .await
            .unwrap();

        let records = store.read_all(EntityType::Hosts).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, "h1");
        assert_eq!(records[0].payload["cpu"], json!(8));
    }

    #[tokio::test]
    async fn test_read_all_without_writes_is_empty() {
        let store = MemorySnapshotStore::new();
        assert!(store.read_all(EntityType::Vms).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_bulk_upsert_keeps_unrelated_keys() {
        let store = MemorySnapshotStore::new();
        store
            .bulk_upsert(
                EntityType::Vms,
                items(json!([{"name": "a"}, {"name": "b"}])),
                "name",
            )
            .await
            .unwrap();
        store
            .bulk_upsert(EntityType::Vms, items(json!([{"name": "b", "cpu_count": 2}])), "name")
            .await
            .unwrap();

        let mut keys: Vec<_> = store
            .read_all(EntityType::Vms)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.key)
            .collect();
        keys.sort();
        assert_eq!(keys, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_replace_all_drops_missing_keys() {
        let store = MemorySnapshotStore::new();
        store
            .bulk_upsert(
                EntityType::Datastores,
                items(json!([{"name": "ds1"}, {"name": "ds2"}])),
                "name",
            )
            .await
            .unwrap();
        store
            .replace_all(EntityType::Datastores, items(json!([{"name": "ds2"}])), "name")
            .await
            .unwrap();

        let records = store.read_all(EntityType::Datastores).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].key, "ds2");
    }

    #[tokio::test]
    async fn test_entity_types_are_isolated() {
        let store = MemorySnapshotStore::new();
        store
            .replace_all(EntityType::Hosts, items(json!([{"name": "x"}])), "name")
            .await
            .unwrap();
        store
            .replace_all(EntityType::Networks, Vec::new(), "name")
            .await
            .unwrap();

        assert_eq!(store.read_all(EntityType::Hosts).await.unwrap().len(), 1);
        assert!(store.read_all(EntityType::Networks).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_records_without_key_are_skipped() {
        let store = MemorySnapshotStore::new();
        let written = store
            .bulk_upsert(
                EntityType::Clusters,
                items(json!([{"name": "c1"}, {"label": "orphan"}])),
                "name",
            )
            .await
            .unwrap();

        assert_eq!(written, 1);
        assert_eq!(store.read_all(EntityType::Clusters).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_keys_count_once() {
        let store = MemorySnapshotStore::new();
        let items = items(json!([{"name": "a", "cpu": 1}, {"name": "a", "cpu": 2}, {"name": "b"}]));

        let upserted = store
            .bulk_upsert(EntityType::Vms, items.clone(), "name")
            .await
            .unwrap();
        let replaced = store.replace_all(EntityType::Vms, items, "name").await.unwrap();

        assert_eq!(upserted, 2);
        assert_eq!(replaced, 2);
        let records = store.read_all(EntityType::Vms).await.unwrap();
        assert_eq!(records.len(), upserted);
        let a = records.iter().find(|r| r.key == "a").unwrap();
        assert_eq!(a.payload["cpu"], json!(2));
    }
}
