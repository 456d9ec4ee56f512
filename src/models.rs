//! Data models and structures
//!
//! Defines the request/result types that flow through the pipeline, the
//! persisted trivia record, and process configuration.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-lite";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_MAX_QUESTIONS: u32 = 50;
pub const DEFAULT_STORAGE_REGION: &str = "us-east-1";

/// A validated request: trimmed, non-empty topic and an in-range count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub topic: String,
    pub question_count: u32,
}

/// Raw model output. Expected to look like `Q1: ...\nA1: ...` but never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub raw_text: String,
}

impl GenerationResult {
    pub fn new(raw_text: impl Into<String>) -> Self {
        Self {
            raw_text: raw_text.into(),
        }
    }
}

/// Document written to the `questions` collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TriviaRecord {
    pub topic: String,
    pub num_questions: i64,
    pub trivia: String,
}

impl TriviaRecord {
    pub fn new(request: &GenerationRequest, result: &GenerationResult) -> Self {
        Self {
            topic: request.topic.clone(),
            num_questions: i64::from(request.question_count),
            trivia: result.raw_text.clone(),
        }
    }
}

// Configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub model: String,
    pub gemini_base_url: String,
    pub request_timeout: Duration,
    pub max_questions: u32,
    pub storage_uri: Option<String>,
    pub storage_endpoint: Option<String>,
    pub storage_region: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Empty values count
    /// as unset.
    pub fn from_vars<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = var("API_KEY")
            .or_else(|| var("GEMINI_API_KEY"))
            .ok_or_else(|| Error::Config("API_KEY not set".to_string()))?;

        let request_timeout = match var("REQUEST_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse_number(&raw, "REQUEST_TIMEOUT_SECS")?),
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let max_questions = match var("MAX_QUESTIONS") {
            Some(raw) => parse_number(&raw, "MAX_QUESTIONS")?,
            None => DEFAULT_MAX_QUESTIONS,
        };
        if max_questions == 0 {
            return Err(Error::Config("MAX_QUESTIONS must be at least 1".to_string()));
        }
        if request_timeout.is_zero() {
            return Err(Error::Config(
                "REQUEST_TIMEOUT_SECS must be at least 1".to_string(),
            ));
        }

        Ok(Self {
            api_key,
            model: var("GEMINI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            gemini_base_url: var("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            request_timeout,
            max_questions,
            storage_uri: var("STORAGE_URI").or_else(|| var("MONGO_URI")),
            storage_endpoint: var("STORAGE_ENDPOINT"),
            storage_region: var("STORAGE_REGION")
                .unwrap_or_else(|| DEFAULT_STORAGE_REGION.to_string()),
        })
    }
}

fn parse_number<T: std::str::FromStr>(raw: &str, key: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} must be a positive integer, got '{}'", key, raw)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_config_defaults() {
        let config = Config::from_vars(lookup(&[("API_KEY", "secret")])).unwrap();

        assert_eq!(config.api_key, "secret");
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.gemini_base_url, DEFAULT_GEMINI_BASE_URL);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.max_questions, 50);
        assert_eq!(config.storage_uri, None);
        assert_eq!(config.storage_region, "us-east-1");
    }

    #[test]
    fn test_config_requires_api_key() {
        let err = Config::from_vars(lookup(&[("MONGO_URI", "mongodb://localhost")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_config_falls_back_to_gemini_api_key() {
        let config = Config::from_vars(lookup(&[("API_KEY", ""), ("GEMINI_API_KEY", "g-key")]))
            .unwrap();
        assert_eq!(config.api_key, "g-key");
    }

    #[test]
    fn test_config_reads_overrides() {
        let config = Config::from_vars(lookup(&[
            ("API_KEY", "secret"),
            ("GEMINI_MODEL", "gemini-2.5-pro"),
            ("REQUEST_TIMEOUT_SECS", "5"),
            ("MAX_QUESTIONS", "10"),
            ("MONGO_URI", "mongodb://localhost:27017"),
        ]))
        .unwrap();

        assert_eq!(config.model, "gemini-2.5-pro");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.max_questions, 10);
        assert_eq!(
            config.storage_uri.as_deref(),
            Some("mongodb://localhost:27017")
        );
    }

    #[test]
    fn test_config_storage_uri_prefers_storage_uri() {
        let config = Config::from_vars(lookup(&[
            ("API_KEY", "k"),
            ("STORAGE_URI", "s3://trivia"),
            ("MONGO_URI", "mongodb://localhost"),
        ]))
        .unwrap();
        assert_eq!(config.storage_uri.as_deref(), Some("s3://trivia"));

        let config = Config::from_vars(lookup(&[
            ("API_KEY", "k"),
            ("MONGO_URI", "mongodb://localhost"),
        ]))
        .unwrap();
        assert_eq!(config.storage_uri.as_deref(), Some("mongodb://localhost"));
    }

    #[test]
    fn test_config_rejects_malformed_numbers() {
        let err = Config::from_vars(lookup(&[("API_KEY", "k"), ("MAX_QUESTIONS", "lots")]))
            .unwrap_err();
        assert!(err.to_string().contains("MAX_QUESTIONS"));

        let err =
            Config::from_vars(lookup(&[("API_KEY", "k"), ("MAX_QUESTIONS", "0")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_trivia_record_field_names() {
        let record = TriviaRecord::new(
            &GenerationRequest {
                topic: "space".to_string(),
                question_count: 2,
            },
            &GenerationResult::new("Q1: a\nA1: b"),
        );

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "topic": "space",
                "num_questions": 2,
                "trivia": "Q1: a\nA1: b"
            })
        );
    }
}
