//! Turns raw user input into a [`GenerationRequest`].

use crate::error::ValidationError;
use crate::models::GenerationRequest;

/// Validate the raw topic and count strings.
///
/// The topic is trimmed and must be non-empty. The count must parse as an
/// integer (surrounding whitespace allowed) and fall within
/// `1..=max_questions`.
pub fn validate(
    topic_raw: &str,
    count_raw: &str,
    max_questions: u32,
) -> Result<GenerationRequest, ValidationError> {
    let topic = topic_raw.trim();
    if topic.is_empty() {
        return Err(ValidationError::EmptyTopic);
    }

    let count = parse_count(count_raw.trim())?;

    let question_count = u32::try_from(count)
        .ok()
        .filter(|c| (1..=max_questions).contains(c))
        .ok_or(ValidationError::CountOutOfRange {
            count,
            max: max_questions,
        })?;

    Ok(GenerationRequest {
        topic: topic.to_string(),
        question_count,
    })
}

/// Parse an integer of any size. Values past `i64` saturate, so they still
/// land in the range check instead of reading as "not an integer".
fn parse_count(raw: &str) -> Result<i64, ValidationError> {
    if let Ok(count) = raw.parse::<i64>() {
        return Ok(count);
    }

    let (negative, digits) = match raw.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, raw.strip_prefix('+').unwrap_or(raw)),
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::InvalidCount);
    }

    Ok(if negative { i64::MIN } else { i64::MAX })
}
