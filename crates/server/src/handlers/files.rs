//! File upload and catalog handlers.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::FileResponse;
use crate::state::AppState;
use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use granary_core::FileFormat;
use std::str::FromStr;

/// Upload a tabular file.
///
/// `PUT /v1/files/{filename}` with the raw file bytes as the body. The format
/// is declared by the filename extension and validated before any store or
/// catalog call. The blob write and the catalog insert are deliberately not
/// atomic: a failed insert after a successful write leaves an orphan blob,
/// which the design tolerates.
pub async fn upload_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    body: Bytes,
) -> ApiResult<(StatusCode, Json<FileResponse>)> {
    let format = FileFormat::from_extension(&filename)?;

    state
        .storage
        .put(&filename, body, format.content_type())
        .await?;
    tracing::info!(filename = %filename, format = %format, "Stored uploaded blob");

    let row = state
        .metadata
        .insert_file(&filename, format.as_str())
        .await?;

    Ok((StatusCode::CREATED, Json(row.into())))
}

/// List all registered files.
pub async fn list_files(State(state): State<AppState>) -> ApiResult<Json<Vec<FileResponse>>> {
    let rows = state.metadata.list_files().await?;
    Ok(Json(rows.into_iter().map(FileResponse::from).collect()))
}

/// Get a single file record by id.
pub async fn get_file(
    State(state): State<AppState>,
    Path(file_id): Path<i64>,
) -> ApiResult<Json<FileResponse>> {
    let row = state
        .metadata
        .get_file(file_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("file id {file_id}")))?;
    Ok(Json(row.into()))
}

/// Download a file's raw bytes with its stored content type.
pub async fn download_file(
    State(state): State<AppState>,
    Path(file_id): Path<i64>,
) -> ApiResult<Response> {
    let row = state
        .metadata
        .get_file(file_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("file id {file_id}")))?;

    let data = state.storage.get(&row.filename).await?;

    // The catalog's format column is the source of truth for the content
    // type; an unparseable value there means the catalog is corrupt.
    let format = FileFormat::from_str(&row.format)
        .map_err(|e| ApiError::Internal(format!("catalog format for '{}': {e}", row.filename)))?;

    Ok(([(header::CONTENT_TYPE, format.content_type())], data).into_response())
}
