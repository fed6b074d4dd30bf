//! Database models mapping to the catalog schema.

use sqlx::FromRow;
use time::OffsetDateTime;

/// Catalog record for one registered file.
///
/// Rows are created on successful upload or merge commit, never updated, and
/// never deleted in-band. `filename` doubles as the object store key and is
/// unique across the catalog.
#[derive(Debug, Clone, FromRow)]
pub struct FileRow {
    pub id: i64,
    pub filename: String,
    pub format: String,
    pub created_at: OffsetDateTime,
}
