//! Error handling and custom error types
//!
//! Each pipeline stage has its own error type so callers can tell a
//! user-correctable input problem from a remote failure. [`Error`] unifies
//! them for code that just needs to propagate.

use thiserror::Error;

/// Local, user-correctable problems with the raw request input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please enter a topic.")]
    EmptyTopic,

    #[error("Number of questions must be an integer.")]
    InvalidCount,

    #[error("Number of questions must be between 1 and {max} (got {count}).")]
    CountOutOfRange { count: i64, max: u32 },
}

/// Any failure talking to the model: transport, auth, quota or a response
/// we could not pull text out of. Only the message is kept.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct GenerationError {
    message: String,
}

impl GenerationError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for GenerationError {
    fn from(e: reqwest::Error) -> Self {
        Self::new(format!("HTTP request error: {}", e))
    }
}

/// Persistence failures. These never affect a generation result that has
/// already been delivered.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Storage is not configured (set STORAGE_URI)")]
    NotConfigured,

    #[error("Storage connection error: {0}")]
    Connection(String),

    #[error("Storage write error: {0}")]
    Write(String),
}

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Gemini error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Database error: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = std::result::Result<T, Error>;
