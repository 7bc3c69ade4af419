use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::domain::{
    headroom, to_payload, Cluster, Datastore, Host, InventoryRecord, Network, Session,
    VirtualMachine, KEY_FIELD,
};
use crate::ports::{InventorySource, SnapshotStore, SourceError};

use super::ServiceError;

/// How a poll writes into the snapshot cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotMode {
    /// Drop cached entities that the latest poll no longer returned
    #[default]
    Reconcile,
    /// Only add or replace; entities removed upstream stay cached
    Accumulate,
}

impl FromStr for SnapshotMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "reconcile" => Ok(Self::Reconcile),
            "accumulate" => Ok(Self::Accumulate),
            other => Err(format!("unknown snapshot mode '{}'", other)),
        }
    }
}

impl fmt::Display for SnapshotMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reconcile => f.write_str("reconcile"),
            Self::Accumulate => f.write_str("accumulate"),
        }
    }
}

/// Entity counts for /overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub clusters: usize,
    pub hosts: usize,
    pub vms: usize,
    pub datastores: usize,
}

/// Cluster utilization with the headroom left under the ceiling
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClusterCapacity {
    pub name: String,
    pub cpu_pct: f64,
    pub mem_pct: f64,
    pub storage_pct: f64,
    pub capacity: BTreeMap<String, f64>,
}

impl From<&Cluster> for ClusterCapacity {
    fn from(cluster: &Cluster) -> Self {
        let capacity = BTreeMap::from([
            ("cpu".to_string(), headroom(cluster.cpu_pct)),
            ("mem".to_string(), headroom(cluster.mem_pct)),
            ("storage".to_string(), headroom(cluster.storage_pct)),
        ]);

        Self {
            name: cluster.name.clone(),
            cpu_pct: cluster.cpu_pct,
            mem_pct: cluster.mem_pct,
            storage_pct: cluster.storage_pct,
            capacity,
        }
    }
}

/// Fetches inventory and records every fetch in the snapshot cache
pub struct InventoryService {
    source: Arc<dyn InventorySource>,
    store: Arc<dyn SnapshotStore>,
    mode: SnapshotMode,
}

impl InventoryService {
    pub fn new(
        source: Arc<dyn InventorySource>,
        store: Arc<dyn SnapshotStore>,
        mode: SnapshotMode,
    ) -> Self {
        Self {
            source,
            store,
            mode,
        }
    }

    async fn snapshot<T: InventoryRecord>(&self, records: &[T]) -> Result<(), ServiceError> {
        let items = records
            .iter()
            .map(|record| to_payload(record))
            .collect::<Result<Vec<_>, _>>()?;

        let written = match self.mode {
            SnapshotMode::Reconcile => self.store.replace_all(T::ENTITY, items, KEY_FIELD).await?,
            SnapshotMode::Accumulate => self.store.bulk_upsert(T::ENTITY, items, KEY_FIELD).await?,
        };

        debug!("Cached {} {} ({})", written, T::ENTITY, self.mode);
        Ok(())
    }

    async fn poll<T, F>(&self, fetch: F) -> Result<Vec<T>, ServiceError>
    where
        T: InventoryRecord,
        F: Future<Output = Result<Vec<T>, SourceError>>,
    {
        let records = fetch.await?;
        self.snapshot(&records).await?;
        Ok(records)
    }

    /// Counts of the four main entity types, fetched concurrently
    pub async fn overview(&self, session: &Session) -> Result<Overview, ServiceError> {
        let (clusters, hosts, vms, datastores) = tokio::try_join!(
            self.poll(self.source.list_clusters(session)),
            self.poll(self.source.list_hosts(session)),
            self.poll(self.source.list_vms(session)),
            self.poll(self.source.list_datastores(session)),
        )?;

        Ok(Overview {
            clusters: clusters.len(),
            hosts: hosts.len(),
            vms: vms.len(),
            datastores: datastores.len(),
        })
    }

    pub async fn clusters(&self, session: &Session) -> Result<Vec<ClusterCapacity>, ServiceError> {
        let clusters = self.poll(self.source.list_clusters(session)).await?;
        Ok(clusters.iter().map(ClusterCapacity::from).collect())
    }

    pub async fn hosts(&self, session: &Session) -> Result<Vec<Host>, ServiceError> {
        self.poll(self.source.list_hosts(session)).await
    }

    pub async fn vms(&self, session: &Session) -> Result<Vec<VirtualMachine>, ServiceError> {
        self.poll(self.source.list_vms(session)).await
    }

    pub async fn datastores(&self, session: &Session) -> Result<Vec<Datastore>, ServiceError> {
        self.poll(self.source.list_datastores(session)).await
    }

    pub async fn networks(&self, session: &Session) -> Result<Vec<Network>, ServiceError> {
        self.poll(self.source.list_networks(session)).await
    }
}
