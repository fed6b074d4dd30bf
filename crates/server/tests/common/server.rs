//! Server test utilities.

use granary_core::config::{AppConfig, MetadataConfig, StagingConfig, StorageConfig};
use granary_metadata::{MetadataStore, SqliteStore};
use granary_server::{AppState, create_router};
use granary_storage::{FilesystemBackend, ObjectStore};
use std::sync::Arc;
use tempfile::TempDir;

/// A test server wrapper with all dependencies.
/// Note: #[allow(dead_code)] because each test file compiles common/ separately.
#[allow(dead_code)]
pub struct TestServer {
    pub router: axum::Router,
    pub state: AppState,
    _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestServer {
    /// Create a new test server with temporary storage and SQLite catalog.
    pub async fn new() -> Self {
        Self::with_staging_ttl_secs(3600).await
    }

    /// Create a test server with a specific staging TTL, for expiry tests.
    pub async fn with_staging_ttl_secs(ttl_secs: u64) -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");

        let storage_path = temp_dir.path().join("blobs");
        let storage: Arc<dyn ObjectStore> = Arc::new(
            FilesystemBackend::new(&storage_path)
                .await
                .expect("Failed to create storage backend"),
        );

        let db_path = temp_dir.path().join("catalog.db");
        let metadata: Arc<dyn MetadataStore> = Arc::new(
            SqliteStore::new(&db_path)
                .await
                .expect("Failed to create metadata store"),
        );

        let config = AppConfig {
            server: Default::default(),
            storage: StorageConfig::Filesystem {
                path: storage_path,
            },
            metadata: MetadataConfig::Sqlite { path: db_path },
            staging: StagingConfig {
                ttl_secs,
                ..Default::default()
            },
        };

        let state = AppState::new(config, storage, metadata);
        let router = create_router(state.clone());

        Self {
            router,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Get a reference to the object store.
    pub fn storage(&self) -> Arc<dyn ObjectStore> {
        self.state.storage.clone()
    }
}
