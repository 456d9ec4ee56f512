//! Persistence of generated trivia
//!
//! Records go to the `questions` collection of the `trivia_db` database,
//! either in MongoDB or as JSON documents in S3-compatible object storage.
//! The backend is picked from the scheme of the storage URI.

pub mod mock;
pub mod mongo;
pub mod object;

pub use mock::MockTriviaStore;
pub use mongo::MongoStore;
pub use object::ObjectStore;

use crate::error::StorageError;
use crate::models::{Config, TriviaRecord};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::Arc;

pub const DATABASE: &str = "trivia_db";
pub const COLLECTION: &str = "questions";

#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Insert one record. Never updates or deletes.
    async fn store(&self, record: &TriviaRecord) -> std::result::Result<(), StorageError>;
}

/// Sink used when no storage URI is configured. Every write fails soft.
pub struct UnconfiguredStore;

#[async_trait]
impl ResultSink for UnconfiguredStore {
    async fn store(&self, _record: &TriviaRecord) -> std::result::Result<(), StorageError> {
        Err(StorageError::NotConfigured)
    }
}

/// Where records are written, derived from the storage URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageTarget {
    Mongo(String),
    Object { bucket: String, prefix: String },
}

impl StorageTarget {
    pub fn parse(uri: &str) -> Result<Self> {
        let uri = uri.trim();

        if uri.starts_with("mongodb://") || uri.starts_with("mongodb+srv://") {
            return Ok(Self::Mongo(uri.to_string()));
        }

        if let Some(rest) = uri.strip_prefix("s3://") {
            let (bucket, prefix) = rest.split_once('/').unwrap_or((rest, ""));
            if bucket.is_empty() {
                return Err(Error::Config(format!("Missing bucket in storage URI '{}'", uri)));
            }
            let prefix = prefix.trim_matches('/');
            let prefix = if prefix.is_empty() {
                String::new()
            } else {
                format!("{}/", prefix)
            };
            return Ok(Self::Object {
                bucket: bucket.to_string(),
                prefix,
            });
        }

        Err(Error::Config(format!(
            "Unsupported storage URI scheme (expected mongodb://, mongodb+srv:// or s3://): '{}'",
            uri
        )))
    }
}

/// Build the sink for `config`. A missing URI yields [`UnconfiguredStore`].
pub async fn build_store(config: &Config) -> Result<Arc<dyn ResultSink>> {
    let Some(uri) = config.storage_uri.as_deref() else {
        tracing::warn!("STORAGE_URI not set; generated trivia will not be stored");
        return Ok(Arc::new(UnconfiguredStore));
    };

    match StorageTarget::parse(uri)? {
        StorageTarget::Mongo(uri) => {
            tracing::info!("Storage backend: MongoDB ({}.{})", DATABASE, COLLECTION);
            Ok(Arc::new(MongoStore::new(uri)))
        }
        StorageTarget::Object { bucket, prefix } => {
            tracing::info!("Storage backend: object storage (bucket: {})", bucket);
            let store = ObjectStore::new(
                bucket,
                prefix,
                config.storage_endpoint.clone(),
                config.storage_region.clone(),
            )
            .await;
            Ok(Arc::new(store))
        }
    }
}
