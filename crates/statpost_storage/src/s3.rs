//! S3 document storage.

use crate::{empty_document, parse_document, to_pretty_json};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use serde_json::Value;
use statpost_error::{StatpostResult, StorageError, StorageErrorKind};
use statpost_interface::DocumentStore;

/// Where the bucket lives.
///
/// Credentials come from the default AWS provider chain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct S3Settings {
    /// Bucket holding both documents
    pub bucket: String,
    /// Region override, otherwise taken from the environment
    pub region: Option<String>,
    /// Custom endpoint for S3-compatible services
    pub endpoint_url: Option<String>,
}

/// S3-backed document store.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    /// Build a client from the ambient AWS configuration.
    ///
    /// # Errors
    ///
    /// Returns [`StorageErrorKind::InvalidConfig`] when the bucket name is empty.
    #[tracing::instrument(skip(settings), fields(bucket = %settings.bucket))]
    pub async fn new(settings: S3Settings) -> StatpostResult<Self> {
        if settings.bucket.trim().is_empty() {
            return Err(StorageError::new(StorageErrorKind::InvalidConfig(
                "S3 bucket name is empty".to_string(),
            ))
            .into());
        }

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if let Some(region) = settings.region.clone() {
            loader = loader.region(aws_config::Region::new(region));
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if let Some(endpoint) = &settings.endpoint_url {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        tracing::info!(region = ?shared.region(), "Opened S3 document store");
        Ok(Self::from_client(Client::from_conf(builder.build()), settings.bucket))
    }

    /// Wrap an existing client.
    pub fn from_client(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Bucket name.
    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl DocumentStore for S3Store {
    #[tracing::instrument(skip(self), fields(bucket = %self.bucket))]
    async fn load(&self, key: &str) -> StatpostResult<Value> {
        let output = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(output) => output,
            Err(err) => {
                let service_error = err.into_service_error();
                if service_error.is_no_such_key() {
                    tracing::debug!("Object not found, returning empty document");
                    return Ok(empty_document());
                }
                return Err(StorageError::new(StorageErrorKind::Read(format!(
                    "s3://{}/{}: {}",
                    self.bucket, key, service_error
                )))
                .into());
            }
        };

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|e| {
                StorageError::new(StorageErrorKind::Read(format!(
                    "s3://{}/{}: {}",
                    self.bucket, key, e
                )))
            })?
            .into_bytes();

        tracing::debug!(size = bytes.len(), "Read object");
        parse_document(key, &bytes)
    }

    #[tracing::instrument(skip(self, document), fields(bucket = %self.bucket))]
    async fn save(&self, key: &str, document: &Value) -> StatpostResult<()> {
        let bytes = to_pretty_json(key, document)?;
        let size = bytes.len();

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| {
                StorageError::new(StorageErrorKind::Write(format!(
                    "s3://{}/{}: {}",
                    self.bucket,
                    key,
                    e.into_service_error()
                )))
            })?;

        tracing::info!(size, "Saved object");
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "s3"
    }
}
