//! Request pipeline: validate, build prompt, generate, then persist.
//!
//! Generation is the primary outcome and is returned as soon as the model
//! answers. Persistence runs afterwards on its own task and reports through a
//! [`PersistenceHandle`], so a storage failure can never take back a result
//! the caller already has.

use crate::ai::{GeminiTriviaClient, GenerationService};
use crate::error::StorageError;
use crate::models::{Config, GenerationRequest, GenerationResult, TriviaRecord};
use crate::store::{self, ResultSink};
use crate::{prompts, validation, Result};
use std::sync::Arc;
use tokio::sync::{oneshot, Mutex};
use tracing::{info, warn};

/// Outcome of the persistence stage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceOutcome {
    Persisted,
    PersistFailed(StorageError),
}

/// Receives the persistence outcome for one successful generation.
#[derive(Debug)]
pub struct PersistenceHandle {
    rx: oneshot::Receiver<PersistenceOutcome>,
}

impl PersistenceHandle {
    /// Wait for the store attempt to finish.
    pub async fn outcome(self) -> PersistenceOutcome {
        self.rx.await.unwrap_or_else(|_| {
            PersistenceOutcome::PersistFailed(StorageError::Write(
                "persistence task ended without reporting".to_string(),
            ))
        })
    }
}

/// A succeeded request.
#[derive(Debug)]
pub struct Generated {
    pub request: GenerationRequest,
    pub result: GenerationResult,
    pub persistence: PersistenceHandle,
}

/// Injectable service bundle used to construct [`Pipeline`] in tests/harnesses.
pub struct PipelineServices {
    pub generator: Arc<dyn GenerationService>,
    pub sink: Arc<dyn ResultSink>,
}

pub struct Pipeline {
    generator: Arc<dyn GenerationService>,
    sink: Arc<dyn ResultSink>,
    max_questions: u32,
    in_flight: Mutex<()>,
}

impl Pipeline {
    pub fn with_services(services: PipelineServices, max_questions: u32) -> Self {
        Self {
            generator: services.generator,
            sink: services.sink,
            max_questions,
            in_flight: Mutex::new(()),
        }
    }

    /// Construct the Gemini client and storage backend described by `config`.
    pub async fn from_config(config: &Config) -> Result<Self> {
        let generator = GeminiTriviaClient::from_config(config, reqwest::Client::new());
        info!("Generation model: {}", generator.model());

        let sink = store::build_store(config).await?;

        Ok(Self::with_services(
            PipelineServices {
                generator: Arc::new(generator),
                sink,
            },
            config.max_questions,
        ))
    }

    /// Run one request from raw user input.
    ///
    /// `Err` carries a validation or generation failure; in both cases nothing
    /// is persisted. Concurrent calls on the same pipeline run one at a time.
    pub async fn request_trivia(&self, topic_raw: &str, count_raw: &str) -> Result<Generated> {
        let _guard = self.in_flight.lock().await;

        let request = validation::validate(topic_raw, count_raw, self.max_questions)
            .inspect_err(|e| warn!("Rejected trivia request: {}", e))?;

        info!(
            "Generating {} questions about '{}'",
            request.question_count, request.topic
        );

        let prompt = prompts::build_prompt(&request.topic, request.question_count);
        let result = self
            .generator
            .generate(&prompt)
            .await
            .inspect_err(|e| warn!("Generation failed: {}", e))?;

        info!("Generated trivia ({} chars)", result.raw_text.len());

        let persistence = self.spawn_persist(TriviaRecord::new(&request, &result));

        Ok(Generated {
            request,
            result,
            persistence,
        })
    }

    fn spawn_persist(&self, record: TriviaRecord) -> PersistenceHandle {
        let (tx, rx) = oneshot::channel();
        let sink = Arc::clone(&self.sink);

        tokio::spawn(async move {
            let outcome = match sink.store(&record).await {
                Ok(()) => {
                    info!("Stored trivia about '{}'", record.topic);
                    PersistenceOutcome::Persisted
                }
                Err(e) => {
                    warn!("Failed to store trivia about '{}': {}", record.topic, e);
                    PersistenceOutcome::PersistFailed(e)
                }
            };
            // Receiver may have been dropped; the outcome is already logged.
            let _ = tx.send(outcome);
        });

        PersistenceHandle { rx }
    }
}
