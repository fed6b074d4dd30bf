//! File catalog abstraction and implementations for Granary.
//!
//! The catalog keeps one record per registered file: surrogate id, unique
//! filename (doubling as the object store key), and declared format. Writes
//! are single atomic statements; name uniqueness is enforced by the database
//! constraint rather than pre-checks.

pub mod error;
pub mod models;
pub mod postgres;
pub mod repos;
pub mod store;

pub use error::{MetadataError, MetadataResult};
pub use models::FileRow;
pub use postgres::PostgresStore;
pub use repos::FileRepo;
pub use store::{MetadataStore, SqliteStore};

use granary_core::config::MetadataConfig;
use std::sync::Arc;

/// Construct the metadata store selected by the configuration.
pub async fn from_config(config: &MetadataConfig) -> MetadataResult<Arc<dyn MetadataStore>> {
    match config {
        MetadataConfig::Sqlite { path } => {
            let store = SqliteStore::new(path).await?;
            Ok(Arc::new(store) as Arc<dyn MetadataStore>)
        }
        MetadataConfig::Postgres {
            url,
            host,
            port,
            username,
            password,
            database,
            max_connections,
        } => {
            let store = if let Some(url) = url {
                // URL takes precedence when both are provided.
                tracing::info!("Connecting to PostgreSQL using connection URL");
                PostgresStore::from_url(url, *max_connections).await?
            } else if let (Some(host), Some(database)) = (host.as_ref(), database.as_ref()) {
                PostgresStore::from_params(
                    host,
                    port.unwrap_or(5432),
                    username.as_deref(),
                    password.as_deref(),
                    database,
                    *max_connections,
                )
                .await?
            } else {
                return Err(MetadataError::Config(
                    "postgres config requires either 'url' or 'host' + 'database'".to_string(),
                ));
            };
            Ok(Arc::new(store) as Arc<dyn MetadataStore>)
        }
    }
}
