use super::{ResultSink, COLLECTION, DATABASE};
use crate::error::StorageError;
use crate::models::TriviaRecord;
use async_trait::async_trait;
use mongodb::error::ErrorKind;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection};
use std::time::Duration;
use tokio::sync::OnceCell;

const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(10);

/// MongoDB sink. Connects on first write and reuses the client afterwards.
pub struct MongoStore {
    uri: String,
    client: OnceCell<Client>,
}

impl MongoStore {
    pub fn new(uri: String) -> Self {
        Self {
            uri,
            client: OnceCell::new(),
        }
    }

    async fn collection(&self) -> Result<Collection<TriviaRecord>, StorageError> {
        let client = self
            .client
            .get_or_try_init(|| async {
                let mut options = ClientOptions::parse(self.uri.as_str())
                    .await
                    .map_err(|e| StorageError::Connection(e.to_string()))?;
                options.app_name = Some("quizically".to_string());
                options
                    .server_selection_timeout
                    .get_or_insert(SERVER_SELECTION_TIMEOUT);

                Client::with_options(options).map_err(|e| StorageError::Connection(e.to_string()))
            })
            .await?;

        Ok(client.database(DATABASE).collection(COLLECTION))
    }
}

fn classify(e: mongodb::error::Error) -> StorageError {
    match e.kind.as_ref() {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Authentication { .. }
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::Io(_) => StorageError::Connection(e.to_string()),
        _ => StorageError::Write(e.to_string()),
    }
}

#[async_trait]
impl ResultSink for MongoStore {
    async fn store(&self, record: &TriviaRecord) -> Result<(), StorageError> {
        let collection = self.collection().await?;

        let inserted = collection.insert_one(record).await.map_err(|e| {
            tracing::error!("Failed to insert trivia record: {}", e);
            classify(e)
        })?;

        tracing::debug!(
            "Inserted trivia record {:?} into {}.{}",
            inserted.inserted_id,
            DATABASE,
            COLLECTION
        );
        Ok(())
    }
}
