use std::sync::Arc;

use chrono::Utc;
use futures::future::try_join_all;
use tracing::info;

use crate::domain::{EntityType, Report, Sheet};
use crate::ports::{ReportWriter, SnapshotStore};

use super::ServiceError;

/// Rendered report ready for download
#[derive(Debug, Clone)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

/// Builds reports from the snapshot cache
pub struct ReportService {
    store: Arc<dyn SnapshotStore>,
    writer: Arc<dyn ReportWriter>,
}

impl ReportService {
    pub fn new(store: Arc<dyn SnapshotStore>, writer: Arc<dyn ReportWriter>) -> Self {
        Self { store, writer }
    }

    /// One sheet per cached entity type; types with no records are left out
    pub async fn assemble(&self) -> Result<Report, ServiceError> {
        let reads = EntityType::ALL.map(|entity| async move {
            self.store
                .read_all(entity)
                .await
                .map(|records| (entity, records))
        });

        let sheets = try_join_all(reads)
            .await?
            .into_iter()
            .filter(|(_, records)| !records.is_empty())
            .map(|(entity, records)| Sheet::from_records(entity, records))
            .collect();

        Ok(Report { sheets })
    }

    pub async fn export(&self) -> Result<ExportFile, ServiceError> {
        let report = self.assemble().await?;
        let bytes = self.writer.render(&report)?;

        let filename = format!(
            "vcenter_report_{}.{}",
            Utc::now().format("%Y%m%d_%H%M%S"),
            self.writer.extension()
        );
        info!(
            "Exported {} ({} sheets, {} bytes)",
            filename,
            report.sheets.len(),
            bytes.len()
        );

        Ok(ExportFile {
            filename,
            content_type: self.writer.content_type(),
            bytes,
        })
    }
}
