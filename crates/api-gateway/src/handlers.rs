//! HTTP handlers
//!
//! Each handler translates one request into one orchestrator call. Domain
//! results are shaped into the JSON bodies the API has always returned.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use common::models::{ModelLookup, ModelRecord, ModelRef, ModelStatus};

use crate::error::ApiError;
use crate::routes::AppState;
use crate::validation::{ApiQuery, ValidatedJson};

/// Greeting returned by `GET /`
pub const WELCOME_MESSAGE: &str = "Welcome to the Athena Control Plane!";

/// Content type of the Prometheus text exposition format
const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

/// Body of load and unload requests
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ModelRequest {
    #[validate(length(min = 1, message = "model_name must not be empty"))]
    pub model_name: String,

    #[validate(length(min = 1, message = "version must not be empty"))]
    pub version: String,
}

impl ModelRequest {
    fn model_ref(self) -> Result<ModelRef, ApiError> {
        Ok(ModelRef::new(self.model_name, self.version)?)
    }
}

/// Query parameters of `GET /api/models`
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub limit: Option<usize>,
}

/// A model record as exposed over HTTP
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSummary {
    pub id: i64,
    pub name: String,
    pub version: String,
    pub status: ModelStatus,
}

impl From<ModelRecord> for ModelSummary {
    fn from(record: ModelRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            version: record.version,
            status: record.status,
        }
    }
}

/// Body of `POST /models/unload`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnloadResponse {
    pub unloaded: String,
}

/// Body of `GET /models/:model_name`
///
/// An unknown name has no version and reports `not_loaded`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelStatusResponse {
    pub model: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub status: ModelStatus,
}

impl From<ModelLookup> for ModelStatusResponse {
    fn from(lookup: ModelLookup) -> Self {
        match lookup {
            ModelLookup::Found(record) => Self {
                model: record.name,
                version: Some(record.version),
                status: record.status,
            },
            ModelLookup::Unknown(name) => Self {
                model: name,
                version: None,
                status: ModelStatus::NotLoaded,
            },
        }
    }
}

pub async fn root() -> Json<Value> {
    Json(json!({ "message": WELCOME_MESSAGE }))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Lists model records, newest first
pub async fn list_models(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<ModelSummary>>, ApiError> {
    let records = state.orchestrator.list(params.limit).await?;
    Ok(Json(records.into_iter().map(ModelSummary::from).collect()))
}

/// Loads a model in the core and records it
pub async fn load_model(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ModelRequest>,
) -> Result<Json<ModelSummary>, ApiError> {
    let model = request.model_ref()?;
    let record = state.orchestrator.load(&model).await?;
    Ok(Json(record.into()))
}

/// Marks a model as not loaded
pub async fn unload_model(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<ModelRequest>,
) -> Result<Json<UnloadResponse>, ApiError> {
    let model = request.model_ref()?;
    let record = state.orchestrator.unload(&model).await?;
    Ok(Json(UnloadResponse {
        unloaded: record.model_ref().to_string(),
    }))
}

/// Reports the last-known status of a model by name
pub async fn get_model(
    State(state): State<AppState>,
    Path(model_name): Path<String>,
) -> Result<Json<ModelStatusResponse>, ApiError> {
    model_status(&state, &model_name).await
}

/// Status of the model literally named `load`
pub async fn get_model_named_load(
    State(state): State<AppState>,
) -> Result<Json<ModelStatusResponse>, ApiError> {
    model_status(&state, "load").await
}

/// Status of the model literally named `unload`
pub async fn get_model_named_unload(
    State(state): State<AppState>,
) -> Result<Json<ModelStatusResponse>, ApiError> {
    model_status(&state, "unload").await
}

async fn model_status(state: &AppState, name: &str) -> Result<Json<ModelStatusResponse>, ApiError> {
    let lookup = state.orchestrator.status(name).await?;
    Ok(Json(lookup.into()))
}

/// Prometheus exposition, when the installed sink supports it
pub async fn metrics(State(state): State<AppState>) -> Result<Response, ApiError> {
    match state.metrics.render() {
        Some(body) => Ok(([(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], body).into_response()),
        None => Err(ApiError::NotFound("metrics exporter is not enabled".to_string())),
    }
}
