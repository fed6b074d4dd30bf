//! Storage trait definitions.

use crate::error::StorageResult;
use async_trait::async_trait;
use bytes::Bytes;

/// Object store abstraction keyed by filename.
///
/// Blobs are opaque bytes with a content-type tag attached at write time.
/// Same-key writes overwrite; there is no ordering guarantee between a
/// concurrent `put` and `get` on the same key (last writer wins).
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Check if an object exists.
    async fn exists(&self, key: &str) -> StorageResult<bool>;

    /// Get an object's content. Fails with `NotFound` if the key is absent.
    /// The body is fully drained into memory; no connection is leaked
    /// regardless of outcome.
    async fn get(&self, key: &str) -> StorageResult<Bytes>;

    /// Write or overwrite an object with its content type.
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()>;

    /// Delete an object. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> StorageResult<()>;

    /// Verify backend connectivity.
    ///
    /// Called once during server startup so the process fails fast instead of
    /// reporting healthy with unreachable storage. The default implementation
    /// is a no-op for backends with nothing to probe.
    async fn health_check(&self) -> StorageResult<()> {
        Ok(())
    }

    /// Static identifier for the backend type, used in logs.
    fn backend_name(&self) -> &'static str;
}
