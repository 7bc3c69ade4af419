pub mod inventory_source;
pub mod report_writer;
pub mod snapshot_store;

pub use inventory_source::{Authenticator, InventorySource, SourceError};
pub use report_writer::{ExportError, ReportWriter};
pub use snapshot_store::{SnapshotStore, StoreError};
