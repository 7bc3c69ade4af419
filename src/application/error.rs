use thiserror::Error;

use crate::domain::CapacityError;
use crate::ports::{ExportError, SourceError, StoreError};

/// Failure taxonomy of the reporting service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Not logged in")]
    Unauthenticated,

    #[error("Login failed")]
    AuthenticationRejected,

    #[error("Missing login field: {0}")]
    MissingCredential(&'static str),

    #[error("Malformed payload: {0}")]
    MalformedPayload(String),

    #[error(transparent)]
    Capacity(#[from] CapacityError),

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] SourceError),

    #[error("Snapshot cache error: {0}")]
    Store(#[from] StoreError),

    #[error("Export failed: {0}")]
    Export(#[from] ExportError),

    #[error("Failed to encode record: {0}")]
    Encode(#[from] serde_json::Error),
}
