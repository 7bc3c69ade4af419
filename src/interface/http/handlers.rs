use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, FromRequest, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use tracing::error;

use crate::application::{
    ClusterCapacity, InventoryService, LoginInput, Overview, ReportService, ServiceError,
    SessionService,
};
use crate::domain::{remaining_capacity, Datastore, Host, Network, VirtualMachine};

use super::assets::asset_response;

/// Error type that maps the service taxonomy onto HTTP responses
#[derive(Debug)]
pub struct AppError(ServiceError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            ServiceError::Unauthenticated | ServiceError::AuthenticationRejected => {
                StatusCode::UNAUTHORIZED
            }
            ServiceError::MissingCredential(_) | ServiceError::MalformedPayload(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::Capacity(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::Upstream(_)
            | ServiceError::Store(_)
            | ServiceError::Export(_)
            | ServiceError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            error!("{}", self.0);
        }

        (status, Json(json!({ "detail": self.0.to_string() }))).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<ServiceError>,
{
    fn from(err: E) -> Self {
        AppError(err.into())
    }
}

impl From<JsonRejection> for ServiceError {
    fn from(rejection: JsonRejection) -> Self {
        ServiceError::MalformedPayload(rejection.body_text())
    }
}

/// JSON request body whose rejections carry the same `{"detail"}` shape as
/// every other error
#[derive(FromRequest)]
#[from_request(via(Json), rejection(AppError))]
pub struct JsonBody<T>(pub T);

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionService>,
    pub inventory: Arc<InventoryService>,
    pub reports: Arc<ReportService>,
}

/// Handler for GET /health
pub async fn health_handler() -> (StatusCode, Json<Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "vreport"
        })),
    )
}

/// Handler for GET /
pub async fn index_handler() -> Response {
    asset_response("index.html")
}

/// Handler for GET /static/{*path}
pub async fn static_handler(Path(path): Path<String>) -> Response {
    asset_response(&path)
}

/// Handler for POST /login
pub async fn login_handler(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<LoginInput>,
) -> Result<Json<Value>, AppError> {
    state.sessions.login(input).await?;
    Ok(Json(json!({ "status": "ok" })))
}

/// Handler for GET /overview
pub async fn overview_handler(State(state): State<AppState>) -> Result<Json<Overview>, AppError> {
    let session = state.sessions.current()?;
    Ok(Json(state.inventory.overview(&session).await?))
}

/// Handler for GET /clusters
pub async fn clusters_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClusterCapacity>>, AppError> {
    let session = state.sessions.current()?;
    Ok(Json(state.inventory.clusters(&session).await?))
}

/// Handler for GET /hosts
pub async fn hosts_handler(State(state): State<AppState>) -> Result<Json<Vec<Host>>, AppError> {
    let session = state.sessions.current()?;
    Ok(Json(state.inventory.hosts(&session).await?))
}

/// Handler for GET /vms
pub async fn vms_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<VirtualMachine>>, AppError> {
    let session = state.sessions.current()?;
    Ok(Json(state.inventory.vms(&session).await?))
}

/// Handler for GET /datastores
pub async fn datastores_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Datastore>>, AppError> {
    let session = state.sessions.current()?;
    Ok(Json(state.inventory.datastores(&session).await?))
}

/// Handler for GET /networks
pub async fn networks_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<Network>>, AppError> {
    let session = state.sessions.current()?;
    Ok(Json(state.inventory.networks(&session).await?))
}

/// Handler for POST /capacity
pub async fn capacity_handler(
    JsonBody(utilization): JsonBody<BTreeMap<String, f64>>,
) -> Result<Json<BTreeMap<String, f64>>, AppError> {
    Ok(Json(remaining_capacity(&utilization)?))
}

/// Handler for GET /export
pub async fn export_handler(State(state): State<AppState>) -> Result<Response, AppError> {
    let file = state.reports.export().await?;
    let disposition = format!("attachment; filename=\"{}\"", file.filename);

    Ok((
        [
            (header::CONTENT_TYPE, file.content_type.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.bytes,
    )
        .into_response())
}
