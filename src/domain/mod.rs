pub mod capacity;
pub mod entity;
pub mod inventory;
pub mod report;
pub mod session;
pub mod snapshot;

pub use capacity::{headroom, remaining_capacity, CapacityError};
pub use entity::EntityType;
pub use inventory::{Cluster, Datastore, Host, InventoryRecord, Network, VirtualMachine, KEY_FIELD};
pub use report::{Report, Sheet};
pub use session::{Credentials, Session};
pub use snapshot::{payload_key, to_payload, Payload, SnapshotRecord};
