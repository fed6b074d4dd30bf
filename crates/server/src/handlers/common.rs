//! Health check and shared response types.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use granary_metadata::FileRow;
use serde::Serialize;
use serde_json::{Value, json};
use time::OffsetDateTime;

/// Catalog record as returned by the API.
#[derive(Debug, Serialize)]
pub struct FileResponse {
    pub id: i64,
    pub filename: String,
    pub format: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<FileRow> for FileResponse {
    fn from(row: FileRow) -> Self {
        Self {
            id: row.id,
            filename: row.filename,
            format: row.format,
            created_at: row.created_at,
        }
    }
}

/// Health check probing storage and catalog connectivity.
///
/// Intentionally unauthenticated for load balancer probes. A failing
/// dependency surfaces as 503 so orchestration stops routing traffic here.
pub async fn health_check(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    state
        .storage
        .health_check()
        .await
        .map_err(|e| ApiError::Unavailable(format!("storage: {e}")))?;
    state
        .metadata
        .health_check()
        .await
        .map_err(|e| ApiError::Unavailable(format!("metadata: {e}")))?;

    Ok(Json(json!({ "status": "ok" })))
}
