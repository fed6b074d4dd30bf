//! HTTP API server for the Granary tabular file service.
//!
//! This crate provides the service's control plane:
//! - File upload and catalog listing
//! - The two-phase merge pipeline (merge-then-preview, commit-or-abandon)
//! - The in-memory staging cache for merge results
//! - Health checking

pub mod error;
pub mod handlers;
pub mod routes;
pub mod staging;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use staging::StagingCache;
pub use state::AppState;
