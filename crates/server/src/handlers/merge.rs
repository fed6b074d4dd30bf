//! Merge pipeline handlers: the two-phase merge/commit workflow.
//!
//! Phase one (`merge`) joins two cataloged files and stages the result in the
//! in-memory cache under a fresh key. Phase two (`commit`) turns a staged
//! result into a permanent file, or the TTL reaps it if the caller walks away.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::FileResponse;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use granary_core::{FileFormat, Table, codec, join};
use granary_metadata::FileRow;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Query parameters for the merge phase.
#[derive(Debug, Deserialize)]
pub struct MergeParams {
    /// ID of the first (left) file.
    pub file_id_1: i64,
    /// ID of the second (right) file.
    pub file_id_2: i64,
    /// Column name shared by both files to join on.
    pub join_column: String,
}

/// Response for a staged merge.
#[derive(Debug, Serialize)]
pub struct MergePreviewResponse {
    /// Key under which the merged dataset is staged.
    pub cache_key: Uuid,
    /// First rows of the merged dataset, record-oriented.
    pub preview: Vec<serde_json::Map<String, serde_json::Value>>,
    /// Human-readable status message.
    pub message: String,
}

/// Query parameters for the commit phase.
#[derive(Debug, Deserialize)]
pub struct CommitParams {
    /// Cache key returned by the merge phase.
    pub cache_key: Uuid,
    /// Name for the new permanent file; its extension picks the format.
    pub new_filename: String,
}

/// Resolve a catalog row and fetch + decode its blob.
///
/// A blob missing or unreadable at the store despite a live catalog row is an
/// orphan record; it surfaces as an internal fetch error wrapping the cause,
/// distinct from the 404 for an unknown file id.
async fn load_table(state: &AppState, row: &FileRow) -> ApiResult<Table> {
    let bytes = state.storage.get(&row.filename).await.map_err(|e| {
        ApiError::Internal(format!("failed to fetch '{}': {e}", row.filename))
    })?;

    let format = FileFormat::from_str(&row.format)
        .map_err(|e| ApiError::Internal(format!("catalog format for '{}': {e}", row.filename)))?;

    Ok(codec::decode(&bytes, format)?)
}

/// Merge two files and stage the result.
///
/// `GET /v1/merge?file_id_1=&file_id_2=&join_column=`
pub async fn merge_files(
    State(state): State<AppState>,
    Query(params): Query<MergeParams>,
) -> ApiResult<Json<MergePreviewResponse>> {
    // Independent catalog reads; a concurrent unrelated upload cannot
    // interfere.
    let row_1 = state.metadata.get_file(params.file_id_1).await?;
    let row_2 = state.metadata.get_file(params.file_id_2).await?;
    let (Some(row_1), Some(row_2)) = (row_1, row_2) else {
        return Err(ApiError::NotFound(
            "one or both file IDs not found".to_string(),
        ));
    };

    let left = load_table(&state, &row_1).await?;
    let right = load_table(&state, &row_2).await?;

    // Validated after decode and before the join so the caller gets a precise
    // diagnosis, and before the staging cache is touched at all.
    let column = params.join_column.as_str();
    if !left.has_column(column) || !right.has_column(column) {
        return Err(ApiError::BadRequest(format!(
            "join column '{column}' not found in both files"
        )));
    }

    let joined = join::inner_join(&left, &right, column)?;
    let payload = joined.to_records_json()?;

    let cache_key = Uuid::new_v4();
    state
        .staging
        .put(cache_key, payload, state.config.staging.ttl());

    tracing::info!(
        cache_key = %cache_key,
        left = %row_1.filename,
        right = %row_2.filename,
        rows = joined.row_count(),
        "Staged merged dataset"
    );

    Ok(Json(MergePreviewResponse {
        cache_key,
        preview: joined.head(state.config.server.preview_rows),
        message: format!("Merged dataset staged in memory with key: {cache_key}"),
    }))
}

/// Commit a staged merge as a new permanent file.
///
/// `POST /v1/merge/commit?cache_key=&new_filename=`
pub async fn commit_merge(
    State(state): State<AppState>,
    Query(params): Query<CommitParams>,
) -> ApiResult<(StatusCode, Json<FileResponse>)> {
    // The only place TTL expiry is observable: an expired key and a key that
    // was never issued both land here.
    let payload = state.staging.get(params.cache_key).ok_or_else(|| {
        ApiError::NotFound("merged dataset not found or expired".to_string())
    })?;

    // The payload was serialized by the merge phase, so a parse failure here
    // is our bug, not the caller's.
    let table = Table::from_records_json(&payload)
        .map_err(|e| ApiError::Internal(format!("staged dataset is unreadable: {e}")))?;

    let format = FileFormat::from_extension(&params.new_filename)?;
    let encoded = codec::encode(&table, format)?;

    // Blob write first, catalog insert second, no rollback: an insert failure
    // after a successful write leaves an orphan blob, which is accepted.
    state
        .storage
        .put(&params.new_filename, encoded, format.content_type())
        .await?;

    let inserted = state
        .metadata
        .insert_file(&params.new_filename, format.as_str())
        .await;

    // Cleanup is unconditional: the staged entry is consumed even when the
    // catalog insert failed.
    state.staging.delete(params.cache_key);

    let row = inserted?;
    tracing::info!(
        cache_key = %params.cache_key,
        filename = %row.filename,
        "Committed merged dataset"
    );

    Ok((StatusCode::CREATED, Json(row.into())))
}
