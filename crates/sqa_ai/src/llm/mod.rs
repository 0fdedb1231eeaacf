use serde::{Deserialize, Serialize};
use sqa_core::error::AppError;

pub mod ollama_llm;

pub use ollama_llm::OllamaLlm;

/// Pass-through model options (temperature, top_p, ...), forwarded verbatim.
pub type ModelOptions = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenUsage {
    pub input: u64,
    pub output: u64,
    pub total: u64,
    pub reasoning: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GenerationResult {
    pub content: String,
    pub cost: f64,
    pub usage: TokenUsage,
}

impl GenerationResult {
    /// A result with no cost or usage accounting, e.g. from a local or mock model.
    pub fn from_content(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            cost: 0.0,
            usage: TokenUsage::default(),
        }
    }
}

/// One-shot text generation. Implementations do not retry.
pub trait Llm {
    /// Cheap readiness probe run once before a report is generated.
    fn check(&self) -> Result<(), AppError> {
        Ok(())
    }

    fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: &ModelOptions,
    ) -> Result<GenerationResult, AppError>;
}
