//! AI service integration for trivia generation
//!
//! [`GenerationService`] is the seam between the pipeline and the hosted
//! model. The Gemini client talks to the real API; the mock is used by
//! tests and local harnesses.

pub mod gemini;
pub mod mock;

pub use gemini::GeminiTriviaClient;
pub use mock::MockGenerationClient;

use crate::error::GenerationError;
use crate::models::GenerationResult;
use async_trait::async_trait;

#[async_trait]
pub trait GenerationService: Send + Sync {
    /// Send `prompt` as a single-turn request and return the model text verbatim.
    async fn generate(&self, prompt: &str) -> Result<GenerationResult, GenerationError>;
}
