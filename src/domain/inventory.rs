use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::EntityType;

/// Field every inventory record is keyed by in the snapshot cache
pub const KEY_FIELD: &str = "name";

/// Common trait for inventory records fetched from the management plane
pub trait InventoryRecord: Serialize + Send + Sync {
    const ENTITY: EntityType;
}

/// Compute cluster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    pub name: String,
    #[serde(default, alias = "cluster", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ha_enabled: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub drs_enabled: Option<bool>,
    // The REST summary does not carry utilization, so these stay at zero
    // unless the source reports them.
    #[serde(default)]
    pub cpu_pct: f64,
    #[serde(default)]
    pub mem_pct: f64,
    #[serde(default)]
    pub storage_pct: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InventoryRecord for Cluster {
    const ENTITY: EntityType = EntityType::Clusters;
}

/// ESXi host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Host {
    pub name: String,
    #[serde(default, alias = "host", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_state: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InventoryRecord for Host {
    const ENTITY: EntityType = EntityType::Hosts;
}

/// Virtual machine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualMachine {
    pub name: String,
    #[serde(default, alias = "vm", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_count: Option<u32>,
    #[serde(
        default,
        rename = "memory_size_MiB",
        skip_serializing_if = "Option::is_none"
    )]
    pub memory_size_mib: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InventoryRecord for VirtualMachine {
    const ENTITY: EntityType = EntityType::Vms;
}

/// Datastore
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datastore {
    pub name: String,
    #[serde(default, alias = "datastore", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub free_space: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub capacity: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InventoryRecord for Datastore {
    const ENTITY: EntityType = EntityType::Datastores;
}

/// Port group or distributed network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Network {
    pub name: String,
    #[serde(default, alias = "network", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl InventoryRecord for Network {
    const ENTITY: EntityType = EntityType::Networks;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_vm_summary_deserializes_with_source_keys() {
        let vm: VirtualMachine = serde_json::from_value(json!({
            "vm": "vm-42",
            "name": "web-01",
            "power_state": "POWERED_ON",
            "cpu_count": 4,
            "memory_size_MiB": 8192
        }))
        .unwrap();

        assert_eq!(vm.id.as_deref(), Some("vm-42"));
        assert_eq!(vm.cpu_count, Some(4));
        assert_eq!(vm.memory_size_mib, Some(8192));
        assert!(vm.extra.is_empty());
    }

    #[test]
    fn test_unknown_fields_pass_through() {
        let datastore: Datastore = serde_json::from_value(json!({
            "datastore": "datastore-11",
            "name": "ds-ssd",
            "type": "VMFS",
            "capacity": 1000,
            "free_space": 250,
            "thin_provisioning_supported": true
        }))
        .unwrap();

        assert_eq!(datastore.kind.as_deref(), Some("VMFS"));
        assert_eq!(
            datastore.extra.get("thin_provisioning_supported"),
            Some(&json!(true))
        );

        let flat = serde_json::to_value(&datastore).unwrap();
        assert_eq!(flat["id"], json!("datastore-11"));
        assert_eq!(flat["thin_provisioning_supported"], json!(true));
    }

    #[test]
    fn test_cluster_utilization_defaults_to_zero() {
        let cluster: Cluster = serde_json::from_value(json!({
            "cluster": "domain-c7",
            "name": "prod",
            "ha_enabled": true,
            "drs_enabled": false
        }))
        .unwrap();

        assert_eq!(cluster.cpu_pct, 0.0);
        assert_eq!(cluster.mem_pct, 0.0);
        assert_eq!(cluster.storage_pct, 0.0);
    }
}
