use crate::{
    error::{Result, UploadError},
    monitoring::{HealthMonitor, HealthStatus, UploadMetrics},
    processing::UploadHandler,
};
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info};

pub const UPLOAD_ROUTE: &str = "/api/UploadPhotosForPerson";
pub const HEALTH_ROUTE: &str = "/api/health";

#[derive(Clone)]
pub struct AppState {
    pub handler: UploadHandler,
    pub metrics: UploadMetrics,
    pub health: HealthMonitor,
    pub max_body_bytes: usize,
}

impl AppState {
    pub fn new(handler: UploadHandler, max_body_bytes: usize) -> Self {
        let metrics = UploadMetrics::new();
        AppState {
            handler,
            health: HealthMonitor::new(metrics.clone()),
            metrics,
            max_body_bytes,
        }
    }
}

pub fn routes(state: AppState) -> Router {
    let body_limit = DefaultBodyLimit::max(state.max_body_bytes);

    Router::new()
        .route(UPLOAD_ROUTE, post(upload_photos))
        .route(HEALTH_ROUTE, get(health))
        .layer(body_limit)
        .with_state(state)
}

impl IntoResponse for UploadError {
    fn into_response(self) -> Response {
        StatusCode::from_u16(self.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            .into_response()
    }
}

pub async fn upload_photos(State(state): State<AppState>, body: Bytes) -> Result<StatusCode> {
    let handler = state.handler.clone();

    // A panic inside the handler becomes a server error instead of a dropped connection.
    let outcome = match tokio::spawn(async move { handler.handle(&body).await }).await {
        Ok(outcome) => outcome,
        Err(e) => {
            error!(error = %e, "Upload handler terminated unexpectedly");
            Err(UploadError::UnexpectedFailure(e.to_string()))
        }
    };

    state.metrics.record_outcome(&outcome).await;

    let report = outcome?;
    info!(
        container = %report.container,
        written = report.written(),
        failed = report.failed(),
        "Upload complete"
    );
    Ok(StatusCode::OK)
}

pub async fn health(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(state.health.get_health_status().await)
}
