use super::client::GeminiHttpClient;
use super::types::{Content, GenerateContentRequest, GenerateContentResponse, Part};
use crate::ai::GenerationService;
use crate::error::GenerationError;
use crate::models::{Config, GenerationResult};
use async_trait::async_trait;
use std::time::Duration;

pub struct GeminiTriviaClient {
    http: GeminiHttpClient,
}

impl GeminiTriviaClient {
    pub fn new(api_key: String, model: String, timeout: Duration) -> Self {
        Self::new_with_client(api_key, model, timeout, reqwest::Client::new())
    }

    pub fn new_with_client(
        api_key: String,
        model: String,
        timeout: Duration,
        client: reqwest::Client,
    ) -> Self {
        Self {
            http: GeminiHttpClient::new_with_client(api_key, model, timeout, client),
        }
    }

    pub fn from_config(config: &Config, client: reqwest::Client) -> Self {
        Self::new_with_client(
            config.api_key.clone(),
            config.model.clone(),
            config.request_timeout,
            client,
        )
        .with_base_url(config.gemini_base_url.clone())
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.http = self.http.with_base_url(base_url);
        self
    }

    pub fn model(&self) -> &str {
        self.http.model()
    }

    /// Concatenate the text parts of the first candidate.
    fn extract_text(response: &GenerateContentResponse) -> Result<String, GenerationError> {
        if let Some(reason) = response
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.as_deref())
        {
            return Err(GenerationError::new(format!(
                "Gemini blocked the prompt ({})",
                reason
            )));
        }

        let candidate = response
            .candidates
            .first()
            .ok_or_else(|| GenerationError::new("No candidates in Gemini response"))?;

        let texts: Vec<&str> = candidate
            .content
            .iter()
            .flat_map(|c| c.parts.iter())
            .filter_map(|p| p.text.as_deref())
            .collect();

        if texts.is_empty() {
            return Err(GenerationError::new(format!(
                "No text in Gemini response (finish reason: {})",
                candidate.finish_reason.as_deref().unwrap_or("unknown")
            )));
        }

        Ok(texts.concat())
    }
}

#[async_trait]
impl GenerationService for GeminiTriviaClient {
    async fn generate(&self, prompt: &str) -> Result<GenerationResult, GenerationError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        let response: GenerateContentResponse = self.http.generate_content(&request).await?;
        let text = Self::extract_text(&response)?;

        tracing::debug!("Gemini returned {} chars", text.len());

        Ok(GenerationResult::new(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_partial_json, header, method, path, path_regex};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";

    fn make_client(server: &MockServer, api_key: &str, model: &str) -> GeminiTriviaClient {
        GeminiTriviaClient::new(
            api_key.to_string(),
            model.to_string(),
            Duration::from_secs(5),
        )
        .with_base_url(server.uri())
    }

    fn generate_content_mock() -> wiremock::MockBuilder {
        Mock::given(method("POST")).and(path_regex(r"/v1beta/models/.+:generateContent"))
    }

    #[tokio::test]
    async fn test_generate_returns_text_verbatim() {
        let server = MockServer::start().await;

        generate_content_mock()
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(serde_json::json!({
                "contents": [{ "role": "user", "parts": [{ "text": "the prompt" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{ "text": "Q1: What is H2O?\nA1: Water\n" }]
                    },
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, "test-key", DEFAULT_MODEL);

        let result = client.generate("the prompt").await.unwrap();
        assert_eq!(result.raw_text, "Q1: What is H2O?\nA1: Water\n");
    }

    #[tokio::test]
    async fn test_generate_concatenates_text_parts() {
        let server = MockServer::start().await;

        generate_content_mock()
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "parts": [{ "text": "Q1: X\n" }, { "text": "A1: Y" }]
                    }
                }]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, "test-key", DEFAULT_MODEL);

        let result = client.generate("prompt").await.unwrap();
        assert_eq!(result.raw_text, "Q1: X\nA1: Y");
    }

    #[tokio::test]
    async fn test_api_error_returns_generation_error() {
        let server = MockServer::start().await;

        generate_content_mock()
            .respond_with(ResponseTemplate::new(403).set_body_string("API key not valid"))
            .mount(&server)
            .await;

        let client = make_client(&server, "bad-key", DEFAULT_MODEL);

        let err = client.generate("prompt").await.unwrap_err();
        assert!(err.message().contains("403"));
        assert!(err.message().contains("API key not valid"));
    }

    #[tokio::test]
    async fn test_quota_error_returns_generation_error() {
        let server = MockServer::start().await;

        generate_content_mock()
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exceeded"))
            .mount(&server)
            .await;

        let client = make_client(&server, "key", DEFAULT_MODEL);

        let err = client.generate("prompt").await.unwrap_err();
        assert!(err.message().contains("quota exceeded"));
    }

    #[tokio::test]
    async fn test_malformed_body_returns_generation_error() {
        let server = MockServer::start().await;

        generate_content_mock()
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = make_client(&server, "key", DEFAULT_MODEL);

        let err = client.generate("prompt").await.unwrap_err();
        assert!(err.message().contains("Failed to parse Gemini response"));
    }

    #[tokio::test]
    async fn test_generate_rejects_empty_candidates() {
        let server = MockServer::start().await;

        generate_content_mock()
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": []
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, "test-key", DEFAULT_MODEL);

        let err = client.generate("prompt").await.unwrap_err();
        assert_eq!(err.message(), "No candidates in Gemini response");
    }

    #[tokio::test]
    async fn test_generate_reports_blocked_prompt() {
        let server = MockServer::start().await;

        generate_content_mock()
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, "test-key", DEFAULT_MODEL);

        let err = client.generate("prompt").await.unwrap_err();
        assert!(err.message().contains("SAFETY"));
    }

    #[tokio::test]
    async fn test_generate_reports_candidate_without_text() {
        let server = MockServer::start().await;

        generate_content_mock()
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{ "finishReason": "MAX_TOKENS" }]
            })))
            .mount(&server)
            .await;

        let client = make_client(&server, "test-key", DEFAULT_MODEL);

        let err = client.generate("prompt").await.unwrap_err();
        assert!(err.message().contains("MAX_TOKENS"));
    }

    #[tokio::test]
    async fn test_generate_strips_models_prefix_from_model_id() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.5-flash-lite:generateContent"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "candidates": [{
                    "content": {
                        "parts": [{ "text": "Q1: a\nA1: b" }]
                    }
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = make_client(&server, "test-key", "models/gemini-2.5-flash-lite");
        assert_eq!(client.model(), "gemini-2.5-flash-lite");

        client.generate("prompt").await.unwrap();
    }

    #[tokio::test]
    async fn test_unreachable_server_returns_generation_error() {
        let server = MockServer::start().await;
        let uri = server.uri();
        drop(server);

        let client = GeminiTriviaClient::new(
            "key".to_string(),
            DEFAULT_MODEL.to_string(),
            Duration::from_secs(2),
        )
        .with_base_url(uri);

        let err = client.generate("prompt").await.unwrap_err();
        assert!(err.message().starts_with("HTTP request error"));
    }
}
