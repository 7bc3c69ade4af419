use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{Cluster, Credentials, Datastore, Host, Network, Session, VirtualMachine};

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("credentials rejected by {server} (status {status})")]
    Rejected { server: String, status: u16 },

    #[error("{path} returned status {status}")]
    Status { path: String, status: u16 },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Port for exchanging credentials for a session
#[async_trait]
pub trait Authenticator: Send + Sync {
    async fn create_session(&self, credentials: &Credentials) -> Result<Session, SourceError>;
}

/// Port for listing inventory from the management plane
#[async_trait]
pub trait InventorySource: Send + Sync {
    async fn list_clusters(&self, session: &Session) -> Result<Vec<Cluster>, SourceError>;

    async fn list_hosts(&self, session: &Session) -> Result<Vec<Host>, SourceError>;

    async fn list_vms(&self, session: &Session) -> Result<Vec<VirtualMachine>, SourceError>;

    async fn list_datastores(&self, session: &Session) -> Result<Vec<Datastore>, SourceError>;

    async fn list_networks(&self, session: &Session) -> Result<Vec<Network>, SourceError>;
}
