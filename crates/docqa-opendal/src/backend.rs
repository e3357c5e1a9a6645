//! Storage backend implementation.

use std::path::Path;

use opendal::{Operator, services};

use crate::TRACING_TARGET;
use crate::config::S3Config;
use crate::error::{StorageError, StorageResult};

/// Best-effort object storage that wraps an OpenDAL operator.
///
/// The client has two states:
///
/// - **enabled**: credentials were complete, uploads and listings hit S3;
/// - **disabled**: credentials were missing, every operation logs and
///   returns an empty result.
///
/// Construction never fails on missing credentials; a misconfigured
/// environment must not take down the question-answering service that
/// treats storage as optional.
#[derive(Clone)]
pub struct ObjectStorage {
    operator: Option<Operator>,
    bucket: String,
}

impl ObjectStorage {
    /// Creates a storage client from optional configuration.
    ///
    /// `None` or incomplete credentials produce a disabled client.
    pub fn from_config(config: Option<S3Config>) -> Self {
        let Some(config) = config else {
            tracing::warn!(
                target: TRACING_TARGET,
                "no storage configuration, object storage disabled"
            );
            return Self::disabled();
        };

        if !config.is_complete() {
            tracing::warn!(
                target: TRACING_TARGET,
                bucket = %config.bucket,
                "storage credentials missing, object storage disabled"
            );
            return Self::disabled();
        }

        match Self::create_operator(&config) {
            Ok(operator) => {
                tracing::info!(
                    target: TRACING_TARGET,
                    bucket = %config.bucket,
                    "object storage initialized"
                );
                Self {
                    operator: Some(operator),
                    bucket: config.bucket,
                }
            }
            Err(err) => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    bucket = %config.bucket,
                    error = %err,
                    "failed to initialize object storage, disabled"
                );
                Self::disabled()
            }
        }
    }

    /// Returns a permanently disabled client.
    pub fn disabled() -> Self {
        Self {
            operator: None,
            bucket: String::new(),
        }
    }

    /// Returns whether the client can reach the bucket.
    pub fn is_enabled(&self) -> bool {
        self.operator.is_some()
    }

    /// Uploads a local file to the bucket under `object_name`.
    ///
    /// Returns `Ok(false)` without touching the network when the client is
    /// disabled, so callers can treat storage as best-effort.
    pub async fn upload(
        &self,
        file_path: impl AsRef<Path>,
        object_name: &str,
    ) -> StorageResult<bool> {
        let Some(operator) = &self.operator else {
            tracing::warn!(
                target: TRACING_TARGET,
                object = %object_name,
                "object storage disabled, skipping upload"
            );
            return Ok(false);
        };

        let data = tokio::fs::read(file_path.as_ref()).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            object = %object_name,
            size = data.len(),
            "uploading object"
        );

        operator.write(object_name, data).await?;

        tracing::info!(
            target: TRACING_TARGET,
            bucket = %self.bucket,
            object = %object_name,
            "object uploaded"
        );

        Ok(true)
    }

    /// Lists object names in the bucket.
    ///
    /// A disabled client and an empty bucket both yield an empty list;
    /// transport failures are real errors.
    pub async fn list(&self) -> StorageResult<Vec<String>> {
        use futures::TryStreamExt;

        let Some(operator) = &self.operator else {
            tracing::warn!(
                target: TRACING_TARGET,
                "object storage disabled, nothing to list"
            );
            return Ok(Vec::new());
        };

        let entries: Vec<_> = operator.lister("/").await?.try_collect().await?;
        let names: Vec<String> = entries.into_iter().map(|e| e.path().to_string()).collect();

        if names.is_empty() {
            tracing::debug!(
                target: TRACING_TARGET,
                bucket = %self.bucket,
                "bucket is empty"
            );
        }

        Ok(names)
    }

    /// Deletes an object from the bucket.
    pub async fn delete(&self, object_name: &str) -> StorageResult<bool> {
        let Some(operator) = &self.operator else {
            return Ok(false);
        };

        operator.delete(object_name).await?;

        tracing::debug!(
            target: TRACING_TARGET,
            object = %object_name,
            "object deleted"
        );

        Ok(true)
    }

    /// Creates an OpenDAL operator from configuration.
    fn create_operator(config: &S3Config) -> StorageResult<Operator> {
        let mut builder = services::S3::default().bucket(&config.bucket);

        if let Some(ref region) = config.region {
            builder = builder.region(region);
        }

        if let Some(ref endpoint) = config.endpoint {
            builder = builder.endpoint(endpoint);
        }

        if let Some(ref access_key_id) = config.access_key_id {
            builder = builder.access_key_id(access_key_id);
        }

        if let Some(ref secret_access_key) = config.secret_access_key {
            builder = builder.secret_access_key(secret_access_key);
        }

        Operator::new(builder)
            .map(|op| op.finish())
            .map_err(|e| StorageError::init(e.to_string()))
    }
}

impl std::fmt::Debug for ObjectStorage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStorage")
            .field("enabled", &self.is_enabled())
            .field("bucket", &self.bucket)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_config_yields_disabled_client() {
        let storage = ObjectStorage::from_config(None);
        assert!(!storage.is_enabled());
    }

    #[tokio::test]
    async fn incomplete_credentials_yield_disabled_client() {
        let config = S3Config::new("answers").with_region("eu-west-1");
        let storage = ObjectStorage::from_config(Some(config));
        assert!(!storage.is_enabled());
    }

    #[tokio::test]
    async fn disabled_client_skips_upload() {
        let storage = ObjectStorage::disabled();
        let uploaded = storage.upload("/nonexistent/file.pdf", "file.pdf").await;
        assert!(matches!(uploaded, Ok(false)));
    }

    #[tokio::test]
    async fn disabled_client_lists_nothing() {
        let storage = ObjectStorage::disabled();
        let names = storage.list().await.unwrap();
        assert!(names.is_empty());
    }

    #[tokio::test]
    async fn disabled_client_deletes_nothing() {
        let storage = ObjectStorage::disabled();
        assert!(matches!(storage.delete("file.pdf").await, Ok(false)));
    }
}
