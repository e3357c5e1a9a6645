//! Object storage configuration.

use clap::Args;
use docqa_opendal::S3Config;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Object storage configuration.
///
/// Storage is best-effort: all fields are optional and missing values
/// disable the feature instead of failing startup.
#[derive(Debug, Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct StorageConfig {
    /// S3 bucket to mirror uploaded documents into.
    #[arg(long, env = "S3_BUCKET")]
    pub s3_bucket: Option<String>,

    /// AWS access key ID.
    #[arg(long, env = "AWS_ACCESS_KEY_ID", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub aws_access_key_id: Option<String>,

    /// AWS secret access key.
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY", hide_env_values = true)]
    #[serde(skip_serializing)]
    pub aws_secret_access_key: Option<String>,

    /// AWS region.
    #[arg(long, env = "AWS_DEFAULT_REGION")]
    pub aws_default_region: Option<String>,

    /// Custom S3-compatible endpoint (MinIO, R2).
    #[arg(long, env = "S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,
}

impl StorageConfig {
    /// Converts into the storage crate's configuration.
    ///
    /// Returns `None` when no bucket is configured, which disables the
    /// storage client entirely.
    pub fn into_s3_config(self) -> Option<S3Config> {
        let bucket = self.s3_bucket?;

        let mut config = S3Config::new(bucket);

        if let Some(region) = self.aws_default_region {
            config = config.with_region(region);
        }

        if let Some(endpoint) = self.s3_endpoint {
            config = config.with_endpoint(endpoint);
        }

        if let (Some(key), Some(secret)) = (self.aws_access_key_id, self.aws_secret_access_key) {
            config = config.with_credentials(key, secret);
        }

        Some(config)
    }

    /// Logs configuration at info level (no sensitive information).
    pub fn log(&self) {
        tracing::info!(
            target: TRACING_TARGET_CONFIG,
            bucket = ?self.s3_bucket,
            region = ?self.aws_default_region,
            credentials_present = self.aws_access_key_id.is_some() && self.aws_secret_access_key.is_some(),
            "storage configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty() -> StorageConfig {
        StorageConfig {
            s3_bucket: None,
            aws_access_key_id: None,
            aws_secret_access_key: None,
            aws_default_region: None,
            s3_endpoint: None,
        }
    }

    #[test]
    fn no_bucket_means_no_config() {
        assert!(empty().into_s3_config().is_none());
    }

    #[test]
    fn bucket_without_credentials_stays_incomplete() {
        let config = StorageConfig {
            s3_bucket: Some("answers".to_string()),
            ..empty()
        };

        let s3 = config.into_s3_config().unwrap();
        assert!(!s3.is_complete());
    }

    #[test]
    fn full_credentials_are_complete() {
        let config = StorageConfig {
            s3_bucket: Some("answers".to_string()),
            aws_access_key_id: Some("AKIA...".to_string()),
            aws_secret_access_key: Some("secret".to_string()),
            aws_default_region: Some("eu-west-1".to_string()),
            s3_endpoint: None,
        };

        let s3 = config.into_s3_config().unwrap();
        assert!(s3.is_complete());
    }
}
