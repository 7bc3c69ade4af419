use thiserror::Error;

use crate::domain::Report;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to render report: {0}")]
    Render(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Port for rendering an assembled report into a downloadable file
pub trait ReportWriter: Send + Sync {
    /// MIME type of the rendered file
    fn content_type(&self) -> &'static str;

    /// File extension without the dot
    fn extension(&self) -> &'static str;

    fn render(&self, report: &Report) -> Result<Vec<u8>, ExportError>;
}
