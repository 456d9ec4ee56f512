use super::{ResultSink, COLLECTION, DATABASE};
use crate::error::StorageError;
use crate::models::TriviaRecord;
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{config::Region, Client as S3Client};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// S3-compatible sink. Each record becomes one JSON object.
///
/// Credentials come from the standard AWS provider chain
/// (`AWS_ACCESS_KEY_ID` / `AWS_SECRET_ACCESS_KEY`, profiles, ...).
pub struct ObjectStore {
    client: S3Client,
    bucket: String,
    prefix: String,
}

impl ObjectStore {
    /// A custom `endpoint` (MinIO, Spaces, ...) switches to path-style
    /// addressing.
    pub async fn new(
        bucket: String,
        prefix: String,
        endpoint: Option<String>,
        region: String,
    ) -> Self {
        let path_style = endpoint.is_some();
        let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(Region::new(region));
        if let Some(endpoint) = endpoint {
            loader = loader.endpoint_url(endpoint);
        }
        let config = loader.load().await;

        let s3_config = aws_sdk_s3::config::Builder::from(&config)
            .force_path_style(path_style)
            .build();

        Self::with_client(S3Client::from_conf(s3_config), bucket, prefix)
    }

    pub fn with_client(client: S3Client, bucket: String, prefix: String) -> Self {
        Self {
            client,
            bucket,
            prefix,
        }
    }
}

/// `{prefix}trivia_db/questions/{timestamp}-{id}.json`
pub fn object_key(prefix: &str, timestamp: DateTime<Utc>, id: Uuid) -> String {
    format!(
        "{}{}/{}/{}-{}.json",
        prefix,
        DATABASE,
        COLLECTION,
        timestamp.format("%Y%m%dT%H%M%SZ"),
        id
    )
}

#[async_trait]
impl ResultSink for ObjectStore {
    async fn store(&self, record: &TriviaRecord) -> Result<(), StorageError> {
        let key = object_key(&self.prefix, Utc::now(), Uuid::new_v4());
        let body = serde_json::to_vec_pretty(record)
            .map_err(|e| StorageError::Write(format!("Failed to serialize record: {}", e)))?;

        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .body(ByteStream::from(body))
            .content_type("application/json")
            .send()
            .await
            .map_err(|e| StorageError::Write(format!("Failed to upload record: {}", e)))?;

        tracing::debug!("Stored trivia record at s3://{}/{}", self.bucket, key);
        Ok(())
    }
}
