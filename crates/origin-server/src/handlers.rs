//! HTTP request handlers for the anchor service.
//!
//! Translates JSON requests into registry calls using axum.

use crate::conversions::{
    creator_from_wire, fingerprint_from_wire, records_to_views, AnchorBody, ConversionError,
    DerivativeBody, PageParams, RecordView,
};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router as AxumRouter,
};
use origin_domain::DerivativeRequest;
use origin_store::{Registry, RegistryError};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The anchor registry
    pub registry: Arc<Registry>,
    /// Page length when a list request omits `limit`
    pub default_page_size: usize,
    /// Largest `limit` a list request may ask for
    pub max_page_size: usize,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthCheckResponse {
    /// Overall health status
    pub status: String,
    /// Number of anchored records
    pub anchor_count: usize,
}

/// Existence check response
#[derive(Debug, Serialize, Deserialize)]
pub struct ExistsResponse {
    /// Whether the fingerprint is anchored
    pub exists: bool,
}

/// Count response
#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    /// Number of anchored records
    pub count: usize,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
    /// Stable machine-readable code
    pub code: String,
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    /// Registry rejected or failed the operation
    Registry(RegistryError),
    /// Request body or path could not be converted
    BadRequest(ConversionError),
    /// Body or query string could not be deserialized
    Malformed(String),
    /// Blocking registry task did not complete
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Registry(e) => {
                let (status, code) = match &e {
                    RegistryError::DuplicateFingerprint(_) => (StatusCode::CONFLICT, "duplicate_fingerprint"),
                    RegistryError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
                    RegistryError::ParentNotFound(_) => (StatusCode::NOT_FOUND, "parent_not_found"),
                    RegistryError::InvalidRange { .. } => (StatusCode::BAD_REQUEST, "invalid_range"),
                    RegistryError::Storage(_)
                    | RegistryError::Corrupt(_)
                    | RegistryError::Poisoned => {
                        error!("Registry failure: {}", e);
                        (StatusCode::INTERNAL_SERVER_ERROR, "internal")
                    }
                };
                (status, code, e.to_string())
            }
            AppError::BadRequest(e) => (StatusCode::BAD_REQUEST, "malformed_request", e.to_string()),
            AppError::Malformed(message) => (StatusCode::BAD_REQUEST, "malformed_request", message),
            AppError::Internal(message) => {
                error!("Registry task failed: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, "internal", message)
            }
        };

        let body = Json(ErrorResponse {
            error: message,
            code: code.to_string(),
        });
        (status, body).into_response()
    }
}

impl From<RegistryError> for AppError {
    fn from(e: RegistryError) -> Self {
        AppError::Registry(e)
    }
}

impl From<ConversionError> for AppError {
    fn from(e: ConversionError) -> Self {
        AppError::BadRequest(e)
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::Malformed(e.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(e: QueryRejection) -> Self {
        AppError::Malformed(e.body_text())
    }
}

/// Run a registry write on the blocking pool
///
/// Inserts hold the write lock across a SQLite append.
async fn run_blocking<T, F>(registry: &Arc<Registry>, op: F) -> Result<T, AppError>
where
    T: Send + 'static,
    F: FnOnce(&Registry) -> Result<T, RegistryError> + Send + 'static,
{
    let registry = Arc::clone(registry);
    tokio::task::spawn_blocking(move || op(&registry))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))?
        .map_err(AppError::from)
}

/// POST /anchors - Anchor an original capture
async fn create_anchor(
    State(state): State<AppState>,
    body: Result<Json<AnchorBody>, JsonRejection>,
) -> Result<(StatusCode, Json<RecordView>), AppError> {
    let Json(body) = body?;
    let (fingerprint, locator, location, organization, creator) = body.into_parts()?;
    let handle = run_blocking(&state.registry, move |registry| {
        registry.insert(fingerprint, locator, location, organization, creator)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(RecordView::from(handle.record()))))
}

/// POST /anchors/:fingerprint/derivatives - Anchor an edit of an existing record
async fn create_derivative(
    State(state): State<AppState>,
    Path(parent): Path<String>,
    body: Result<Json<DerivativeBody>, JsonRejection>,
) -> Result<(StatusCode, Json<RecordView>), AppError> {
    let Json(body) = body?;
    let parent = fingerprint_from_wire(&parent)?;
    let request = DerivativeRequest::try_from(body)?;
    let parent_handle = state.registry.handle(&parent)?;
    let handle = run_blocking(&state.registry, move |registry| {
        registry.insert_derivative(&parent_handle, request)
    })
    .await?;
    Ok((StatusCode::CREATED, Json(RecordView::from(handle.record()))))
}

/// GET /anchors/:fingerprint - Full record
async fn get_anchor(
    State(state): State<AppState>,
    Path(fingerprint): Path<String>,
) -> Result<Json<RecordView>, AppError> {
    let fingerprint = fingerprint_from_wire(&fingerprint)?;
    let record = state.registry.lookup(&fingerprint)?;
    Ok(Json(RecordView::from(&record)))
}

/// GET /anchors/:fingerprint/exists
async fn anchor_exists(
    State(state): State<AppState>,
    Path(fingerprint): Path<String>,
) -> Result<Json<ExistsResponse>, AppError> {
    let fingerprint = fingerprint_from_wire(&fingerprint)?;
    Ok(Json(ExistsResponse {
        exists: state.registry.exists(&fingerprint),
    }))
}

/// GET /anchors/:fingerprint/lineage - Edit chain back to the original
async fn get_lineage(
    State(state): State<AppState>,
    Path(fingerprint): Path<String>,
) -> Result<Json<Vec<RecordView>>, AppError> {
    let fingerprint = fingerprint_from_wire(&fingerprint)?;
    let chain = state.registry.lineage(&fingerprint)?;
    Ok(Json(records_to_views(&chain)))
}

/// GET /anchors/:fingerprint/derivatives - Direct edits of a record
async fn get_derivatives(
    State(state): State<AppState>,
    Path(fingerprint): Path<String>,
) -> Result<Json<Vec<RecordView>>, AppError> {
    let fingerprint = fingerprint_from_wire(&fingerprint)?;
    let children = state.registry.derivatives_of(&fingerprint)?;
    Ok(Json(records_to_views(&children)))
}

/// GET /anchors?start=&limit= - One page in insertion order
///
/// The page cap is a transport limit; the registry itself pages any length.
async fn list_anchors(
    State(state): State<AppState>,
    params: Result<Query<PageParams>, QueryRejection>,
) -> Result<Json<Vec<RecordView>>, AppError> {
    let Query(params) = params?;
    let start = params.start.unwrap_or(0);
    let limit = params.limit.unwrap_or(state.default_page_size as i64);
    if limit > state.max_page_size as i64 {
        return Err(AppError::Registry(RegistryError::InvalidRange {
            start,
            limit,
            reason: format!("limit exceeds maximum page size of {}", state.max_page_size),
        }));
    }
    let page = state.registry.paginate(start, limit)?;
    Ok(Json(records_to_views(&page)))
}

/// GET /fingerprints - Every fingerprint in insertion order
async fn list_fingerprints(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(
        state
            .registry
            .list_all_fingerprints()
            .iter()
            .map(|fp| fp.to_hex())
            .collect(),
    )
}

/// GET /count
async fn count(State(state): State<AppState>) -> Json<CountResponse> {
    Json(CountResponse {
        count: state.registry.count(),
    })
}

/// GET /creators/:creator/anchors - Records submitted by one creator
async fn list_by_creator(
    State(state): State<AppState>,
    Path(creator): Path<String>,
) -> Result<Json<Vec<RecordView>>, AppError> {
    let creator = creator_from_wire(&creator)?;
    let records = state.registry.list_by_creator(&creator);
    Ok(Json(records_to_views(&records)))
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthCheckResponse> {
    Json(HealthCheckResponse {
        status: "healthy".to_string(),
        anchor_count: state.registry.count(),
    })
}

/// Create the axum router with all routes
pub fn create_router(state: AppState) -> AxumRouter {
    AxumRouter::new()
        .route("/anchors", post(create_anchor).get(list_anchors))
        .route("/anchors/:fingerprint", get(get_anchor))
        .route("/anchors/:fingerprint/exists", get(anchor_exists))
        .route("/anchors/:fingerprint/lineage", get(get_lineage))
        .route(
            "/anchors/:fingerprint/derivatives",
            post(create_derivative).get(get_derivatives),
        )
        .route("/fingerprints", get(list_fingerprints))
        .route("/count", get(count))
        .route("/creators/:creator/anchors", get(list_by_creator))
        .route("/health", get(health_check))
        .with_state(state)
}
