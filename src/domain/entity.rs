use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Inventory category tracked by the snapshot cache
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityType {
    Clusters,
    Hosts,
    Vms,
    Datastores,
    Networks,
}

impl EntityType {
    /// All entity types, in export order
    pub const ALL: [EntityType; 5] = [
        EntityType::Clusters,
        EntityType::Hosts,
        EntityType::Vms,
        EntityType::Datastores,
        EntityType::Networks,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Clusters => "clusters",
            Self::Hosts => "hosts",
            Self::Vms => "vms",
            Self::Datastores => "datastores",
            Self::Networks => "networks",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown entity type: {0}")]
pub struct UnknownEntityType(pub String);

impl FromStr for EntityType {
    type Err = UnknownEntityType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|entity| entity.as_str() == s)
            .ok_or_else(|| UnknownEntityType(s.to_string()))
    }
}
