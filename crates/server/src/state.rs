//! Application state shared across handlers.

use crate::staging::StagingCache;
use granary_core::config::AppConfig;
use granary_metadata::MetadataStore;
use granary_storage::ObjectStore;
use std::sync::Arc;

/// Shared handle bundle injected into every request handler.
///
/// All adapters are constructed once at startup and passed in explicitly;
/// construction failures surface in `main` before the server binds, so a
/// handler can never hold an unusable store.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Object storage backend.
    pub storage: Arc<dyn ObjectStore>,
    /// File catalog.
    pub metadata: Arc<dyn MetadataStore>,
    /// Staging cache for merge results.
    pub staging: StagingCache,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        config: AppConfig,
        storage: Arc<dyn ObjectStore>,
        metadata: Arc<dyn MetadataStore>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            storage,
            metadata,
            staging: StagingCache::new(),
        }
    }
}
