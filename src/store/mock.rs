use super::ResultSink;
use crate::error::StorageError;
use crate::models::TriviaRecord;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// In-memory sink that remembers what it was given.
#[derive(Clone)]
pub struct MockTriviaStore {
    records: Arc<Mutex<Vec<TriviaRecord>>>,
    failure: Option<StorageError>,
    store_count: Arc<Mutex<usize>>,
}

impl MockTriviaStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(Mutex::new(Vec::new())),
            failure: None,
            store_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Make every `store` call fail with `error`.
    pub fn failing_with(mut self, error: StorageError) -> Self {
        self.failure = Some(error);
        self
    }

    pub fn get_store_count(&self) -> usize {
        *self.store_count.lock().unwrap()
    }

    pub fn get_records(&self) -> Vec<TriviaRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl Default for MockTriviaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ResultSink for MockTriviaStore {
    async fn store(&self, record: &TriviaRecord) -> Result<(), StorageError> {
        *self.store_count.lock().unwrap() += 1;

        if let Some(error) = &self.failure {
            return Err(error.clone());
        }

        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}
