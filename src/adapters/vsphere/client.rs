use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;

use crate::domain::{Cluster, Credentials, Datastore, Host, Network, Session, VirtualMachine};
use crate::ports::{Authenticator, InventorySource, SourceError};

const SESSION_PATH: &str = "/rest/com/vmware/cis/session";
const SESSION_HEADER: &str = "vmware-api-session-id";

/// Every vSphere REST (`/rest`) response wraps its payload in `value`
#[derive(Debug, Deserialize)]
struct Envelope<T> {
    value: T,
}

/// vCenter adapter using the vSphere Automation REST API
#[derive(Debug, Clone)]
pub struct VsphereClient {
    client: Client,
}

impl VsphereClient {
    pub fn new(accept_invalid_certs: bool) -> Result<Self, SourceError> {
        let client = Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()?;
        Ok(Self { client })
    }

    /// Base URL for a server, defaulting to HTTPS when no scheme is given
    fn base_url(server: &str) -> String {
        let server = server.trim_end_matches('/');
        if server.starts_with("http://") || server.starts_with("https://") {
            server.to_string()
        } else {
            format!("https://{}", server)
        }
    }

    async fn list<T: DeserializeOwned>(
        &self,
        session: &Session,
        path: &str,
    ) -> Result<Vec<T>, SourceError> {
        let url = format!("{}{}", Self::base_url(&session.server), path);
        let response = self
            .client
            .get(&url)
            .header(SESSION_HEADER, &session.token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }

        let envelope: Envelope<Vec<T>> = response.json().await?;
        debug!("{} returned {} items", path, envelope.value.len());
        Ok(envelope.value)
    }
}

#[async_trait]
impl Authenticator for VsphereClient {
    async fn create_session(&self, credentials: &Credentials) -> Result<Session, SourceError> {
        let url = format!("{}{}", Self::base_url(&credentials.server), SESSION_PATH);
        let response = self
            .client
            .post(&url)
            .basic_auth(&credentials.username, Some(&credentials.password))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(SourceError::Rejected {
                server: credentials.server.clone(),
                status: status.as_u16(),
            });
        }

        let envelope: Envelope<String> = response.json().await?;
        Ok(Session::new(credentials.server.clone(), envelope.value))
    }
}

#[async_trait]
impl InventorySource for VsphereClient {
    async fn list_clusters(&self, session: &Session) -> Result<Vec<Cluster>, SourceError> {
        self.list(session, "/rest/vcenter/cluster").await
    }

    async fn list_hosts(&self, session: &Session) -> Result<Vec<Host>, SourceError> {
        self.list(session, "/rest/vcenter/host").await
    }

    async fn list_vms(&self, session: &Session) -> Result<Vec<VirtualMachine>, SourceError> {
        self.list(session, "/rest/vcenter/vm").await
    }

    async fn list_datastores(&self, session: &Session) -> Result<Vec<Datastore>, SourceError> {
        self.list(session, "/rest/vcenter/datastore").await
    }

    async fn list_networks(&self, session: &Session) -> Result<Vec<Network>, SourceError> {
        self.list(session, "/rest/vcenter/network").await
    }
}
