//! HTTP endpoint handlers

use std::sync::Arc;

use axum::{
    extract::rejection::JsonRejection,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use stockpile_core::{
    parse_item_id, CreateItemPayload, DeleteBatchPayload, FieldError, Item, StoreError,
    UpdateItemPayload,
};

use crate::AppState;

/// Error surface of the API.
///
/// Validation failures carry the full field-error list; not-found is
/// an expected outcome with a fixed body; store failures are reported
/// generically and only logged in detail.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation failed")]
    Validation(Vec<FieldError>),

    #[error("item not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<Vec<FieldError>> for ApiError {
    fn from(errors: Vec<FieldError>) -> Self {
        Self::Validation(errors)
    }
}

impl From<FieldError> for ApiError {
    fn from(error: FieldError) -> Self {
        Self::Validation(vec![error])
    }
}

// Bodies that fail deserialization (wrong types, invalid JSON) are a
// client error on the request body, same 400 shape as constraint
// violations.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::Validation(vec![FieldError::new("body", rejection.body_text())])
    }
}

#[derive(Debug, Serialize)]
struct ValidationBody {
    errors: Vec<FieldError>,
}

#[derive(Debug, Serialize)]
struct MessageBody {
    message: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(ValidationBody { errors })).into_response()
            }
            ApiError::NotFound | ApiError::Store(StoreError::NotFound(_)) => {
                // Expected outcome, not a failure
                tracing::debug!("item not found");
                (
                    StatusCode::NOT_FOUND,
                    Json(MessageBody {
                        message: "Item not found",
                    }),
                )
                    .into_response()
            }
            ApiError::Store(err) => {
                tracing::error!("store failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(MessageBody {
                        message: "Internal server error",
                    }),
                )
                    .into_response()
            }
        }
    }
}

/// POST /item
pub async fn create_item(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateItemPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Item>), ApiError> {
    let Json(payload) = payload?;
    let new_item = payload.validate()?;
    let item = state.service.create(new_item)?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// GET /item
pub async fn list_items(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Item>>, ApiError> {
    let items = state.service.list()?;
    Ok(Json(items))
}

/// GET /item/{id}
pub async fn get_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Item>, ApiError> {
    let id = parse_item_id(&id)?;
    match state.service.get_by_id(id)? {
        Some(item) => Ok(Json(item)),
        None => Err(ApiError::NotFound),
    }
}

/// PUT /item/{id}
pub async fn update_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UpdateItemPayload>, JsonRejection>,
) -> Result<Json<Item>, ApiError> {
    let id = parse_item_id(&id)?;
    let Json(payload) = payload?;
    let patch = payload.validate()?;
    let item = state.service.update(id, patch)?;
    Ok(Json(item))
}

/// DELETE /item/{id}
pub async fn delete_item(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_item_id(&id)?;
    state.service.delete(id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Response for batch delete
#[derive(Debug, Serialize)]
pub struct DeleteBatchResponse {
    pub deleted: usize,
}

/// DELETE /item/batch
///
/// Best-effort: ids with no matching row are skipped, not errors.
pub async fn delete_batch(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DeleteBatchPayload>, JsonRejection>,
) -> Result<Json<DeleteBatchResponse>, ApiError> {
    let Json(payload) = payload?;
    let ids = payload.validate()?;
    let deleted = state.service.delete_many(&ids)?;
    Ok(Json(DeleteBatchResponse { deleted }))
}

/// Response for the health check
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}
