//! Analysis listing and deletion handlers

use std::any::Any;

use axum::extract::rejection::PathRejection;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use analyses_core::{AnalysisRecord, AnalysisStatus};

use crate::error::ApiError;
use crate::state::AppState;

/// List failed because the store answered with an error
pub const LIST_DB_FAILED: &str = "Failed to retrieve analyses from database";
/// List failed for any other reason
pub const LIST_FAILED: &str = "Failed to retrieve analyses";
pub const ID_REQUIRED: &str = "Analysis ID is required";
pub const NOT_FOUND: &str = "Analysis not found";
pub const DELETE_FAILED: &str = "Failed to delete analysis";
pub const DELETED: &str = "Analysis deleted successfully";

#[derive(Debug, Serialize)]
pub struct ListAnalysesResponse {
    pub success: bool,
    pub analyses: Vec<AnalysisRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAnalysisResponse {
    pub success: bool,
    pub message: String,
    pub deleted_id: String,
}

/// GET /api/analyses/list
/// List active analyses, newest first
pub async fn list_analyses(
    State(state): State<AppState>,
) -> Result<Json<ListAnalysesResponse>, ApiError> {
    let analyses = state
        .store()
        .list_by_status(&AnalysisStatus::Active)
        .await
        .map_err(|e| {
            let message = if e.is_store_reported() {
                LIST_DB_FAILED
            } else {
                LIST_FAILED
            };
            ApiError::internal(message, e)
        })?;

    tracing::debug!(count = analyses.len(), "Listed active analyses");

    Ok(Json(ListAnalysesResponse {
        success: true,
        analyses,
    }))
}

/// DELETE /api/analyses/delete/{id}
/// Permanently delete one analysis
pub async fn delete_analysis(
    State(state): State<AppState>,
    id: Result<Path<String>, PathRejection>,
) -> Result<Json<DeleteAnalysisResponse>, ApiError> {
    // An undecodable segment is treated the same as a missing one
    let id = match id {
        Ok(Path(id)) if !id.trim().is_empty() => id,
        _ => return Err(ApiError::BadRequest(ID_REQUIRED.to_string())),
    };

    match state.store().delete_single(&id).await {
        Ok(Some(_row)) => {
            tracing::info!(%id, "Deleted analysis");
            Ok(Json(DeleteAnalysisResponse {
                success: true,
                message: DELETED.to_string(),
                deleted_id: id,
            }))
        }
        // Store succeeded but returned no row
        Ok(None) => Err(ApiError::NotFound(NOT_FOUND.to_string())),
        Err(e) if e.is_no_single_row() => {
            tracing::debug!(%id, error = %e, "No single analysis matched");
            Err(ApiError::NotFound(NOT_FOUND.to_string()))
        }
        Err(e) => Err(ApiError::internal(DELETE_FAILED, e)),
    }
}

/// DELETE /api/analyses/delete
/// Delete without an id segment
pub async fn delete_analysis_without_id() -> ApiError {
    ApiError::BadRequest(ID_REQUIRED.to_string())
}

/// Response for a panic inside [`list_analyses`]
pub fn list_panicked(panic: Box<dyn Any + Send + 'static>) -> Response {
    ApiError::from_panic(LIST_FAILED, panic).into_response()
}

/// Response for a panic inside [`delete_analysis`]
pub fn delete_panicked(panic: Box<dyn Any + Send + 'static>) -> Response {
    ApiError::from_panic(DELETE_FAILED, panic).into_response()
}
