mod adapters;
mod application;
mod config;
mod domain;
mod interface;
mod ports;

use std::sync::Arc;

use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use adapters::{MemorySnapshotStore, SqliteSnapshotStore, VsphereClient, XlsxReportWriter};
use application::{InventoryService, ReportService, SessionService};
use config::Config;
use interface::http::{create_router, AppState};
use ports::SnapshotStore;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();

    // Load configuration; a bad value aborts before anything touches the cache
    let config = Config::from_env()?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("vreport={},tower_http=info", config.log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("🚀 Starting vreport v{}", env!("CARGO_PKG_VERSION"));
    info!("Configuration: {:?}", config);

    // Initialize adapters
    let vcenter = Arc::new(VsphereClient::new(config.vcenter_insecure)?);
    if config.vcenter_insecure {
        warn!("⚠ TLS certificate verification for vCenter is disabled");
    }

    let store: Arc<dyn SnapshotStore> = if config.in_memory() {
        info!("✓ Using in-memory snapshot cache");
        Arc::new(MemorySnapshotStore::new())
    } else {
        let store = SqliteSnapshotStore::open(config.db_path.clone())?;
        info!("✓ Snapshot cache at {}", store.path().display());
        Arc::new(store)
    };

    // Create services
    let state = AppState {
        sessions: Arc::new(SessionService::new(vcenter.clone(), config.login_defaults())),
        inventory: Arc::new(InventoryService::new(
            vcenter,
            store.clone(),
            config.snapshot_mode,
        )),
        reports: Arc::new(ReportService::new(store, Arc::new(XlsxReportWriter::new()))),
    };

    info!("✓ Services initialized (snapshot mode: {})", config.snapshot_mode);

    // Create HTTP server
    let app = create_router(state);
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("✓ vreport listening on {}", addr);
    info!("  → Dashboard: http://localhost:{}", config.port);
    info!("  → Export: http://localhost:{}/export", config.port);

    axum::serve(listener, app).await?;

    Ok(())
}
