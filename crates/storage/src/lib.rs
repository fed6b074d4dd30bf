//! Object storage abstraction and backends for Granary.
//!
//! Blobs are stored under their catalog filename. Two backends are provided:
//! - Local filesystem (development and tests)
//! - S3-compatible services (AWS S3, MinIO)

pub mod backends;
pub mod error;
pub mod traits;

pub use backends::{FilesystemBackend, S3Backend};
pub use error::{StorageError, StorageResult};
pub use traits::ObjectStore;

use granary_core::config::StorageConfig;
use std::sync::Arc;

/// Construct the object store selected by the configuration.
///
/// This is the single construction point for storage handles: failures here
/// (unreachable service, unverifiable bucket) abort startup rather than
/// producing a handle that fails on first use.
pub async fn from_config(config: &StorageConfig) -> StorageResult<Arc<dyn ObjectStore>> {
    config.validate().map_err(StorageError::Config)?;

    match config {
        StorageConfig::Filesystem { path } => {
            let backend = FilesystemBackend::new(path).await?;
            Ok(Arc::new(backend))
        }
        StorageConfig::S3 {
            bucket,
            endpoint,
            region,
            access_key_id,
            secret_access_key,
            force_path_style,
        } => {
            let backend = S3Backend::new(
                bucket,
                endpoint.clone(),
                region.clone(),
                access_key_id.clone(),
                secret_access_key.clone(),
                *force_path_style,
            )
            .await?;
            Ok(Arc::new(backend))
        }
    }
}
