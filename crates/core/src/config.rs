//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum accepted upload body size in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
    /// Number of rows returned in merge previews.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_upload_bytes: default_max_upload_bytes(),
            preview_rows: default_preview_rows(),
        }
    }
}

fn default_bind() -> String {
    "127.0.0.1:8080".to_string()
}

fn default_max_upload_bytes() -> usize {
    64 * 1024 * 1024
}

fn default_preview_rows() -> usize {
    5
}

/// Storage backend configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Local filesystem storage.
    Filesystem {
        /// Root directory for blobs.
        path: PathBuf,
    },
    /// S3-compatible storage (AWS S3, MinIO, ...).
    S3 {
        /// Bucket name. Created at startup if it does not exist.
        bucket: String,
        /// Optional endpoint URL (for MinIO, etc.). Bare `host:port` forms
        /// are normalized to `http://host:port`.
        endpoint: Option<String>,
        /// AWS region.
        region: Option<String>,
        /// Access key ID. Falls back to the ambient AWS credential chain
        /// when unset. Prefer env vars or IAM roles over config files.
        access_key_id: Option<String>,
        /// Secret access key. Must be set together with `access_key_id`.
        secret_access_key: Option<String>,
        /// Force path-style URLs (`endpoint/bucket/key`). Required for MinIO.
        #[serde(default)]
        force_path_style: bool,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Filesystem {
            path: PathBuf::from("data/blobs"),
        }
    }
}

impl StorageConfig {
    /// Validate invariants that serde cannot express.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            StorageConfig::Filesystem { .. } => Ok(()),
            StorageConfig::S3 {
                access_key_id,
                secret_access_key,
                ..
            } => match (access_key_id.as_ref(), secret_access_key.as_ref()) {
                (Some(_), Some(_)) | (None, None) => Ok(()),
                _ => Err(
                    "s3 config requires both access_key_id and secret_access_key when either is set"
                        .to_string(),
                ),
            },
        }
    }
}

/// Metadata store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MetadataConfig {
    /// SQLite database (recommended for testing and small deployments).
    Sqlite {
        /// Database file path.
        path: PathBuf,
    },
    /// PostgreSQL database.
    Postgres {
        /// Connection URL. Takes precedence over individual fields.
        url: Option<String>,
        /// Database host.
        host: Option<String>,
        /// Database port (default: 5432).
        port: Option<u16>,
        /// Database username.
        username: Option<String>,
        /// Database password.
        password: Option<String>,
        /// Database name.
        database: Option<String>,
        /// Maximum pool connections.
        #[serde(default = "default_pg_max_connections")]
        max_connections: u32,
    },
}

impl Default for MetadataConfig {
    fn default() -> Self {
        MetadataConfig::Sqlite {
            path: PathBuf::from("data/catalog.db"),
        }
    }
}

fn default_pg_max_connections() -> u32 {
    5
}

/// Staging cache configuration for merge results.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StagingConfig {
    /// Seconds a staged merge survives before expiring (default: 1 hour).
    #[serde(default = "default_staging_ttl_secs")]
    pub ttl_secs: u64,
    /// Interval between background sweeps of expired entries.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for StagingConfig {
    fn default() -> Self {
        Self {
            ttl_secs: default_staging_ttl_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl StagingConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }
}

fn default_staging_ttl_secs() -> u64 {
    3600
}

fn default_sweep_interval_secs() -> u64 {
    60
}

/// Top-level application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage backend configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Metadata store configuration.
    #[serde(default)]
    pub metadata: MetadataConfig,
    /// Staging cache configuration.
    #[serde(default)]
    pub staging: StagingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sensible() {
        let config = AppConfig::default();
        assert_eq!(config.server.bind, "127.0.0.1:8080");
        assert_eq!(config.server.preview_rows, 5);
        assert_eq!(config.staging.ttl_secs, 3600);
        assert!(matches!(config.storage, StorageConfig::Filesystem { .. }));
        assert!(matches!(config.metadata, MetadataConfig::Sqlite { .. }));
    }

    #[test]
    fn s3_config_rejects_half_credentials() {
        let config = StorageConfig::S3 {
            bucket: "data-files".to_string(),
            endpoint: None,
            region: None,
            access_key_id: Some("key".to_string()),
            secret_access_key: None,
            force_path_style: false,
        };
        assert!(config.validate().is_err());
    }
}
