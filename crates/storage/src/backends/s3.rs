//! S3-compatible storage backend using the AWS SDK.
//!
//! Works against AWS S3 proper and S3-compatible services such as MinIO
//! (set `endpoint` and `force_path_style`).

use crate::error::{StorageError, StorageResult};
use crate::traits::ObjectStore;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_smithy_http_client::Builder as SmithyHttpClientBuilder;
use bytes::Bytes;
use std::time::Duration;
use tracing::instrument;

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// S3 object store scoped to a single bucket.
pub struct S3Backend {
    client: Client,
    bucket: String,
}

impl std::fmt::Debug for S3Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Backend")
            .field("bucket", &self.bucket)
            .finish_non_exhaustive()
    }
}

/// Convert an SDK error to `StorageError::S3`, preserving the cause.
fn map_s3_error<E>(err: aws_sdk_s3::error::SdkError<E>) -> StorageError
where
    E: std::error::Error + Send + Sync + 'static,
{
    StorageError::S3(Box::new(err))
}

/// Map an SDK error for a keyed operation, distinguishing NotFound.
fn map_sdk_error<E>(err: aws_sdk_s3::error::SdkError<E>, key: &str) -> StorageError
where
    E: std::error::Error + Send + Sync + 'static,
{
    if let aws_sdk_s3::error::SdkError::ServiceError(ref service_err) = err {
        if service_err.raw().status().as_u16() == 404 {
            return StorageError::NotFound(key.to_string());
        }
    }
    map_s3_error(err)
}

impl S3Backend {
    /// Create a new S3 backend and ensure the bucket exists.
    ///
    /// Bucket verification runs here rather than per request so an unreachable
    /// or misconfigured service surfaces as `StorageError::Unavailable` at
    /// startup, distinct from ordinary operation failures.
    pub async fn new(
        bucket: &str,
        endpoint: Option<String>,
        region: Option<String>,
        access_key_id: Option<String>,
        secret_access_key: Option<String>,
        force_path_style: bool,
    ) -> StorageResult<Self> {
        if access_key_id.is_some() != secret_access_key.is_some() {
            return Err(StorageError::Config(
                "s3 config requires both access_key_id and secret_access_key when either is set"
                    .to_string(),
            ));
        }

        let resolved_region = region.unwrap_or_else(|| "us-east-1".to_string());
        let mut builder = aws_sdk_s3::config::Builder::new()
            .behavior_version(BehaviorVersion::latest())
            .region(aws_config::Region::new(resolved_region.clone()));

        if let (Some(key_id), Some(secret)) = (access_key_id, secret_access_key) {
            let credentials = aws_sdk_s3::config::Credentials::new(
                key_id,
                secret,
                None,
                None,
                "granary-config",
            );
            builder = builder.credentials_provider(credentials);
        } else {
            let shared = aws_config::defaults(BehaviorVersion::latest())
                .region(aws_config::Region::new(resolved_region.clone()))
                .load()
                .await;
            if let Some(provider) = shared.credentials_provider() {
                builder = builder.credentials_provider(provider);
            }
        }

        if let Some(endpoint_url) = &endpoint {
            // Handle bare host:port endpoints (e.g., "minio:9000").
            let lower = endpoint_url.to_ascii_lowercase();
            let normalized = if lower.starts_with("http://") || lower.starts_with("https://") {
                endpoint_url.clone()
            } else {
                format!("http://{endpoint_url}")
            };

            // For explicit HTTP endpoints (local MinIO), use an HTTP-only
            // client so SDK initialization doesn't depend on trust roots.
            if normalized.to_ascii_lowercase().starts_with("http://") {
                builder = builder.http_client(SmithyHttpClientBuilder::new().build_http());
            }
            builder = builder.endpoint_url(normalized);
        }

        if force_path_style {
            builder = builder.force_path_style(true);
        }

        let backend = Self {
            client: Client::from_conf(builder.build()),
            bucket: bucket.to_string(),
        };
        backend.ensure_bucket().await?;
        Ok(backend)
    }

    /// Check the bucket exists, creating it if absent.
    async fn ensure_bucket(&self) -> StorageResult<()> {
        match self
            .client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            Err(aws_sdk_s3::error::SdkError::ServiceError(service_err))
                if service_err.raw().status().as_u16() == 404 =>
            {
                self.client
                    .create_bucket()
                    .bucket(&self.bucket)
                    .send()
                    .await
                    .map_err(|e| {
                        StorageError::Unavailable(format!(
                            "could not create bucket '{}': {e}",
                            self.bucket
                        ))
                    })?;
                tracing::info!(bucket = %self.bucket, "Created storage bucket");
                Ok(())
            }
            Err(e) => Err(StorageError::Unavailable(format!(
                "could not verify bucket '{}': {e}",
                self.bucket
            ))),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Backend {
    #[instrument(skip(self), fields(backend = "s3"))]
    async fn exists(&self, key: &str) -> StorageResult<bool> {
        match self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(true),
            Err(aws_sdk_s3::error::SdkError::ServiceError(service_err))
                if service_err.raw().status().as_u16() == 404 =>
            {
                Ok(false)
            }
            Err(e) => Err(map_s3_error(e)),
        }
    }

    #[instrument(skip(self), fields(backend = "s3"))]
    async fn get(&self, key: &str) -> StorageResult<Bytes> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error(e, key))?;

        // Drain the body fully; collect() consumes the response stream so the
        // connection is released on both the success and error path.
        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| StorageError::S3(Box::new(e)))?
            .into_bytes();
        Ok(bytes)
    }

    #[instrument(skip(self, data), fields(backend = "s3", size = data.len()))]
    async fn put(&self, key: &str, data: Bytes, content_type: &str) -> StorageResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(data.into())
            .send()
            .await
            .map_err(map_s3_error)?;
        Ok(())
    }

    #[instrument(skip(self), fields(backend = "s3"))]
    async fn delete(&self, key: &str) -> StorageResult<()> {
        match self
            .client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(()),
            // S3 delete does not normally error on a missing key, but map it
            // for compatible services that do.
            Err(aws_sdk_s3::error::SdkError::ServiceError(ref service_err))
                if service_err.raw().status().as_u16() == 404 =>
            {
                Ok(())
            }
            Err(e) => Err(map_s3_error(e)),
        }
    }

    #[instrument(skip(self), fields(backend = "s3"))]
    async fn health_check(&self) -> StorageResult<()> {
        let probe = async {
            let marker_key = ".granary-health-check";
            self.put(marker_key, Bytes::from_static(b"health-check"), "text/plain")
                .await?;
            self.delete(marker_key).await
        };

        tokio::time::timeout(HEALTH_CHECK_TIMEOUT, probe)
            .await
            .map_err(|_| {
                StorageError::Unavailable(format!(
                    "health check timed out after {}s",
                    HEALTH_CHECK_TIMEOUT.as_secs()
                ))
            })?
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
