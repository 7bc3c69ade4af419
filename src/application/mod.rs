mod error;
mod inventory;
mod report;
mod session;

pub use error::ServiceError;
pub use inventory::{ClusterCapacity, InventoryService, Overview, SnapshotMode};
pub use report::ReportService;
pub use session::{LoginInput, SessionService};
