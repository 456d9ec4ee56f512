//! Quizically - AI trivia generator
//!
//! Takes a topic and a question count, asks Gemini for formatted trivia
//! questions and answers, hands the text back to the caller, and stores a
//! copy in a document store when one is configured.

pub mod ai;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod prompts;
pub mod store;
pub mod validation;

pub use error::{Error, Result};
