use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable error codes shared by the core and AI crates.
pub mod codes {
    pub const INGEST_ROWS_INVALID: &str = "INGEST_ROWS_INVALID";
    pub const LITE_CONFIG_INVALID: &str = "LITE_CONFIG_INVALID";
    pub const LITE_PROMPT_ENCODE_FAILED: &str = "LITE_PROMPT_ENCODE_FAILED";
    pub const AI_REMOTE_NOT_ALLOWED: &str = "AI_REMOTE_NOT_ALLOWED";
    pub const AI_OLLAMA_UNHEALTHY: &str = "AI_OLLAMA_UNHEALTHY";
    pub const AI_OLLAMA_UNREACHABLE: &str = "AI_OLLAMA_UNREACHABLE";
    pub const AI_GENERATION_FAILED: &str = "AI_GENERATION_FAILED";
}

/// Structured error returned by every fallible operation in the pipeline.
///
/// Parsing and citation reconciliation never produce one: malformed model output
/// degrades to empty results instead.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    /// Marks transient failures (network). Nothing in this workspace retries on it.
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "[{}] {} ({})", self.code, self.message, details),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

impl std::error::Error for AppError {}
