pub mod export;
pub mod store;
pub mod vsphere;

#[cfg(test)]
pub mod fake;

pub use export::XlsxReportWriter;
pub use store::{MemorySnapshotStore, SqliteSnapshotStore};
pub use vsphere::VsphereClient;
