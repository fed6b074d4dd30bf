//! File catalog repository trait.

use crate::error::MetadataResult;
use crate::models::FileRow;
use async_trait::async_trait;

/// Repository for registered file records.
#[async_trait]
pub trait FileRepo: Send + Sync {
    /// Insert a new file record and return it with its assigned identity.
    ///
    /// Name uniqueness is enforced by the database constraint, not a
    /// pre-check, so concurrent inserts of the same name cannot race past
    /// each other; the loser gets `MetadataError::AlreadyExists`.
    async fn insert_file(&self, filename: &str, format: &str) -> MetadataResult<FileRow>;

    /// Get a file record by id.
    async fn get_file(&self, id: i64) -> MetadataResult<Option<FileRow>>;

    /// Get a file record by its unique filename.
    async fn get_file_by_name(&self, filename: &str) -> MetadataResult<Option<FileRow>>;

    /// List all file records.
    async fn list_files(&self) -> MetadataResult<Vec<FileRow>>;
}
