use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use sqa_core::error::{codes, AppError};

use crate::llm::ModelOptions;
use crate::ollama::OllamaClient;
use crate::response::ParseOptions;

pub const DEFAULT_OLLAMA_BASE_URL: &str = "http://127.0.0.1:11434";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;
const MAX_TIMEOUT_SECS: u64 = 600;

fn default_base_url() -> String {
    DEFAULT_OLLAMA_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Settings for one-shot report generation.
///
/// Every key other than the named fields is collected into `options` and forwarded
/// to the model unchanged, e.g. `{"model": "llama3.1", "temperature": 0.2}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LitePipelineConfig {
    #[serde(default)]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub ollama_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Year written into `[LLM MEMORY | <year>]` markers; current UTC year when unset.
    #[serde(default)]
    pub memory_year: Option<i32>,
    #[serde(flatten)]
    pub options: ModelOptions,
}

impl LitePipelineConfig {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ollama_base_url: default_base_url(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            memory_year: None,
            options: ModelOptions::new(),
        }
    }

    pub fn with_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }

    pub fn with_memory_year(mut self, year: i32) -> Self {
        self.memory_year = Some(year);
        self
    }

    pub fn from_json_str(raw: &str) -> Result<Self, AppError> {
        let config: Self = serde_json::from_str(raw).map_err(|e| {
            AppError::new(codes::LITE_CONFIG_INVALID, "Failed to decode pipeline config")
                .with_details(e.to_string())
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, AppError> {
        let raw = fs::read_to_string(path).map_err(|e| {
            AppError::new(codes::LITE_CONFIG_INVALID, "Failed to read pipeline config")
                .with_details(format!("path={}; err={e}", path.display()))
        })?;
        Self::from_json_str(&raw)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.model.trim().is_empty() {
            return Err(AppError::new(
                codes::LITE_CONFIG_INVALID,
                "Lite pipeline config requires a model",
            ));
        }
        if self.timeout_secs == 0 || self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(AppError::new(
                codes::LITE_CONFIG_INVALID,
                "timeout_secs must be between 1 and 600",
            )
            .with_details(format!("timeout_secs={}", self.timeout_secs)));
        }
        if let Some(year) = self.memory_year {
            if !(1000..=9999).contains(&year) {
                return Err(AppError::new(
                    codes::LITE_CONFIG_INVALID,
                    "memory_year must be a four-digit year",
                )
                .with_details(format!("memory_year={year}")));
            }
        }
        OllamaClient::new(&self.ollama_base_url)?;
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn parse_options(&self) -> ParseOptions {
        match self.memory_year {
            Some(year) => ParseOptions::with_memory_year(year),
            None => ParseOptions::default(),
        }
    }
}
