use super::GenerationService;
use crate::error::GenerationError;
use crate::models::GenerationResult;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

/// Scripted generation client. Responses cycle in order; with none
/// configured it echoes a single Q/A pair.
#[derive(Clone)]
pub struct MockGenerationClient {
    responses: Arc<Mutex<Vec<Result<String, GenerationError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl MockGenerationClient {
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(Vec::new())),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_response(self, response: String) -> Self {
        self.responses.lock().unwrap().push(Ok(response));
        self
    }

    pub fn with_error(self, message: &str) -> Self {
        self.responses
            .lock()
            .unwrap()
            .push(Err(GenerationError::new(message)));
        self
    }

    pub fn get_call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn get_prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

impl Default for MockGenerationClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl GenerationService for MockGenerationClient {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult, GenerationError> {
        let call = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            prompts.len()
        };

        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(GenerationResult::new("Q1: Mock question?\nA1: Mock answer"))
        } else {
            let index = (call - 1) % responses.len();
            responses[index].clone().map(GenerationResult::new)
        }
    }
}
