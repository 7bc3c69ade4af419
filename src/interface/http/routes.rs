use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{
    capacity_handler, clusters_handler, datastores_handler, export_handler, health_handler,
    hosts_handler, index_handler, login_handler, networks_handler, overview_handler,
    static_handler, vms_handler, AppState,
};

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Frontend
        .route("/", get(index_handler))
        .route("/static/{*path}", get(static_handler))
        // API routes
        .route("/health", get(health_handler))
        .route("/login", post(login_handler))
        .route("/overview", get(overview_handler))
        .route("/clusters", get(clusters_handler))
        .route("/hosts", get(hosts_handler))
        .route("/vms", get(vms_handler))
        .route("/datastores", get(datastores_handler))
        .route("/networks", get(networks_handler))
        .route("/capacity", post(capacity_handler))
        .route("/export", get(export_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
