use async_trait::async_trait;
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use crate::adapters::XlsxReportWriter;
use crate::domain::{
    Cluster, Credentials, Datastore, Host, Network, Report, Session, VirtualMachine,
};
use crate::ports::{Authenticator, ExportError, InventorySource, ReportWriter, SourceError};

pub const FAKE_USER: &str = "administrator@vsphere.local";
pub const FAKE_PASSWORD: &str = "secret";
pub const FAKE_TOKEN: &str = "fake-session-token";

/// In-process stand-in for a vCenter that accepts a single credential pair
#[derive(Default)]
pub struct FakeVcenter {
    pub clusters: Mutex<Vec<Cluster>>,
    pub hosts: Mutex<Vec<Host>>,
    pub vms: Mutex<Vec<VirtualMachine>>,
    pub datastores: Mutex<Vec<Datastore>>,
    pub networks: Mutex<Vec<Network>>,
    pub fail_listing: bool,
}

fn records<T: DeserializeOwned>(value: Value) -> Vec<T> {
    serde_json::from_value(value).expect("fake inventory must deserialize")
}

impl FakeVcenter {
    pub fn populated() -> Self {
        Self {
            clusters: Mutex::new(records(json!([
                {"cluster": "domain-c7", "name": "prod", "cpu_pct": 40.0, "mem_pct": 90.0, "storage_pct": 85.0},
                {"cluster": "domain-c8", "name": "dev", "cpu_pct": 10.0, "mem_pct": 20.0, "storage_pct": 30.0}
            ]))),
            hosts: Mutex::new(records(json!([
                {"host": "host-10", "name": "esx-01", "connection_state": "CONNECTED"},
                {"host": "host-11", "name": "esx-02", "connection_state": "CONNECTED"},
                {"host": "host-12", "name": "esx-03", "connection_state": "MAINTENANCE"}
            ]))),
            vms: Mutex::new(records(json!([
                {"vm": "vm-1", "name": "web-01", "power_state": "POWERED_ON", "cpu_count": 2},
                {"vm": "vm-2", "name": "db-01", "power_state": "POWERED_OFF", "memory_size_MiB": 16384}
            ]))),
            datastores: Mutex::new(records(json!([
                {"datastore": "datastore-1", "name": "ds-ssd", "type": "VMFS", "capacity": 1000, "free_space": 400}
            ]))),
            networks: Mutex::new(records(json!([
                {"network": "network-1", "name": "VM Network", "type": "STANDARD_PORTGROUP"}
            ]))),
            fail_listing: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_listing: true,
            ..Self::default()
        }
    }

    fn check(&self, session: &Session, path: &str) -> Result<(), SourceError> {
        if self.fail_listing || session.token != FAKE_TOKEN {
            return Err(SourceError::Status {
                path: path.to_string(),
                status: 503,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Authenticator for FakeVcenter {
    async fn create_session(&self, credentials: &Credentials) -> Result<Session, SourceError> {
        if credentials.username == FAKE_USER && credentials.password == FAKE_PASSWORD {
            Ok(Session::new(credentials.server.clone(), FAKE_TOKEN))
        } else {
            Err(SourceError::Rejected {
                server: credentials.server.clone(),
                status: 401,
            })
        }
    }
}

#[async_trait]
impl InventorySource for FakeVcenter {
    async fn list_clusters(&self, session: &Session) -> Result<Vec<Cluster>, SourceError> {
        self.check(session, "/rest/vcenter/cluster")?;
        Ok(self.clusters.lock().clone())
    }

    async fn list_hosts(&self, session: &Session) -> Result<Vec<Host>, SourceError> {
        self.check(session, "/rest/vcenter/host")?;
        Ok(self.hosts.lock().clone())
    }

    async fn list_vms(&self, session: &Session) -> Result<Vec<VirtualMachine>, SourceError> {
        self.check(session, "/rest/vcenter/vm")?;
        Ok(self.vms.lock().clone())
    }

    async fn list_datastores(&self, session: &Session) -> Result<Vec<Datastore>, SourceError> {
        self.check(session, "/rest/vcenter/datastore")?;
        Ok(self.datastores.lock().clone())
    }

    async fn list_networks(&self, session: &Session) -> Result<Vec<Network>, SourceError> {
        self.check(session, "/rest/vcenter/network")?;
        Ok(self.networks.lock().clone())
    }
}

/// Report writer that keeps the last report it was asked to render
#[derive(Default)]
pub struct RecordingWriter {
    pub last: Mutex<Option<Report>>,
}

impl ReportWriter for RecordingWriter {
    fn content_type(&self) -> &'static str {
        XlsxReportWriter.content_type()
    }

    fn extension(&self) -> &'static str {
        XlsxReportWriter.extension()
    }

    fn render(&self, report: &Report) -> Result<Vec<u8>, ExportError> {
        *self.last.lock() = Some(report.clone());
        XlsxReportWriter.render(report)
    }
}
