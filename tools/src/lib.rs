//! HTTP surface for the ROI service.
//!
//! Routes:
//!   POST /simulate          compute only, nothing persisted
//!   POST /scenarios         compute, persist, 201 with the stored scenario
//!   GET  /scenarios         ?skip=&limit= summaries in creation order
//!   GET  /scenarios/:id     full scenario or 404
//!   POST /report/generate   capture lead, stream PDF attachment
//!   GET  /assumptions       active projection assumptions
//!   GET  /health            liveness

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Json, Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use invoice_roi_core::{
    config::RoiAssumptions,
    error::RoiError,
    scenario::{NewScenario, ReportRequest, Scenario, ScenarioSummary, SimulationInput, SimulationResult},
    service::RoiService,
    types::ScenarioId,
};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::net::TcpListener;

/// Shared handler state. The service owns a single SQLite connection,
/// so requests take turns through the mutex.
#[derive(Clone)]
pub struct AppState {
    service: Arc<Mutex<RoiService>>,
}

impl AppState {
    pub fn new(service: RoiService) -> Self {
        Self {
            service: Arc::new(Mutex::new(service)),
        }
    }

    fn service(&self) -> Result<MutexGuard<'_, RoiService>, ApiError> {
        self.service
            .lock()
            .map_err(|_| ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "service state poisoned"))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// An error ready to leave the process as an HTTP response.
#[derive(Debug)]
pub struct ApiError {
    status:  StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }
}

impl From<RoiError> for ApiError {
    fn from(e: RoiError) -> Self {
        let status = match &e {
            RoiError::Validation { .. }    => StatusCode::UNPROCESSABLE_ENTITY,
            RoiError::NotFound { .. }      => StatusCode::NOT_FOUND,
            RoiError::DuplicateName { .. } => StatusCode::CONFLICT,
            RoiError::Render(_)
            | RoiError::Database(_)
            | RoiError::Serialization(_)
            | RoiError::Other(_)           => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self::new(status, e.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, format!("Invalid request body: {}", e.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(e: QueryRejection) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, format!("Invalid query: {}", e.body_text()))
    }
}

impl From<PathRejection> for ApiError {
    fn from(e: PathRejection) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, format!("Invalid path: {}", e.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            log::error!("{} {}", self.status, self.message);
        } else {
            log::warn!("{} {}", self.status, self.message);
        }
        (self.status, Json(ErrorResponse { error: self.message })).into_response()
    }
}

/// Query parameters for the scenario listing.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub skip:  Option<u32>,
    pub limit: Option<u32>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/simulate", post(simulate))
        .route("/scenarios", get(list_scenarios).post(create_scenario))
        .route("/scenarios/:id", get(get_scenario))
        .route("/report/generate", post(generate_report))
        .route("/assumptions", get(assumptions))
        .route("/health", get(health))
        .fallback(not_found)
        .with_state(state)
}

/// Serve until the listener fails.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    log::info!("ROI server listening on http://{}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "roi-server",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

async fn not_found() -> ApiError {
    ApiError::new(StatusCode::NOT_FOUND, "Not found")
}

async fn assumptions(State(st): State<AppState>) -> Result<Json<RoiAssumptions>, ApiError> {
    let assumptions = *st.service()?.assumptions();
    Ok(Json(assumptions))
}

async fn simulate(
    State(st): State<AppState>,
    payload: Result<Json<SimulationInput>, JsonRejection>,
) -> Result<Json<SimulationResult>, ApiError> {
    let Json(inputs) = payload?;
    let result = st.service()?.simulate(&inputs)?;
    Ok(Json(result))
}

async fn create_scenario(
    State(st): State<AppState>,
    payload: Result<Json<NewScenario>, JsonRejection>,
) -> Result<(StatusCode, Json<Scenario>), ApiError> {
    let Json(request) = payload?;
    let scenario = st.service()?.create_scenario(&request)?;
    Ok((StatusCode::CREATED, Json(scenario)))
}

async fn list_scenarios(
    State(st): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<Json<Vec<ScenarioSummary>>, ApiError> {
    let Query(params) = params?;
    let rows = st.service()?.list_scenarios(params.skip, params.limit)?;
    Ok(Json(rows))
}

async fn get_scenario(
    State(st): State<AppState>,
    id: Result<Path<ScenarioId>, PathRejection>,
) -> Result<Json<Scenario>, ApiError> {
    let Path(id) = id?;
    let scenario = st.service()?.get_scenario(id)?;
    Ok(Json(scenario))
}

async fn generate_report(
    State(st): State<AppState>,
    payload: Result<Json<ReportRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload?;
    let report = st.service()?.generate_report(&request)?;

    let headers = [
        (header::CONTENT_TYPE, "application/pdf".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", report.filename),
        ),
    ];
    Ok((headers, report.bytes).into_response())
}
