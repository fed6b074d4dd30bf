//! Route configuration.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let max_upload = state.config.server.max_upload_bytes;

    Router::new()
        // Health check (intentionally unauthenticated for probes)
        .route("/v1/health", get(handlers::health_check))
        // File catalog
        .route("/v1/files", get(handlers::list_files))
        // Upload targets a filename, lookup targets an id; both share the
        // path segment so they live on one route.
        .route(
            "/v1/files/{file}",
            put(handlers::upload_file).get(handlers::get_file),
        )
        .route("/v1/files/{file_id}/content", get(handlers::download_file))
        // Merge pipeline
        .route("/v1/merge", get(handlers::merge_files))
        .route("/v1/merge/commit", post(handlers::commit_merge))
        .layer(DefaultBodyLimit::max(max_upload))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
