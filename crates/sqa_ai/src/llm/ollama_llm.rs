use serde::{Deserialize, Serialize};
use sqa_core::error::{codes, AppError};

use super::{GenerationResult, Llm, ModelOptions, TokenUsage};
use crate::config::LitePipelineConfig;
use crate::ollama::OllamaClient;

#[derive(Debug, Clone)]
pub struct OllamaLlm {
    client: OllamaClient,
}

impl OllamaLlm {
    pub fn new(client: OllamaClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &LitePipelineConfig) -> Result<Self, AppError> {
        let client = OllamaClient::new(&config.ollama_base_url)?.with_timeout(config.timeout());
        Ok(Self::new(client))
    }

    pub fn client(&self) -> &OllamaClient {
        &self.client
    }
}

#[derive(Debug, Clone, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "options_are_empty")]
    options: &'a ModelOptions,
}

fn options_are_empty(options: &&ModelOptions) -> bool {
    options.is_empty()
}

#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u64>,
    #[serde(default)]
    eval_count: Option<u64>,
}

impl GenerateResponse {
    fn into_result(self) -> GenerationResult {
        let input = self.prompt_eval_count.unwrap_or(0);
        let output = self.eval_count.unwrap_or(0);
        GenerationResult {
            content: self.response,
            // Local inference has no per-token price.
            cost: 0.0,
            usage: TokenUsage {
                input,
                output,
                total: input + output,
                reasoning: 0,
            },
        }
    }
}

impl Llm for OllamaLlm {
    fn check(&self) -> Result<(), AppError> {
        self.client.health_check()
    }

    fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: &ModelOptions,
    ) -> Result<GenerationResult, AppError> {
        let url = format!("{}/api/generate", self.client.base_url());
        let req = GenerateRequest {
            model,
            prompt,
            stream: false,
            options,
        };

        let body = serde_json::to_value(req).map_err(|e| {
            AppError::new(codes::AI_GENERATION_FAILED, "Failed to encode generation request")
                .with_details(e.to_string())
        })?;
        let resp = ureq::post(&url).timeout(self.client.timeout()).send_json(body);

        match resp {
            Ok(r) if r.status() == 200 => {
                let v: GenerateResponse = r.into_json().map_err(|e| {
                    AppError::new(codes::AI_GENERATION_FAILED, "Failed to decode generation response")
                        .with_details(e.to_string())
                })?;
                if v.response.trim().is_empty() {
                    return Err(AppError::new(
                        codes::AI_GENERATION_FAILED,
                        "Generation response was empty",
                    )
                    .with_details(format!("model={model}")));
                }
                Ok(v.into_result())
            }
            Ok(r) => Err(
                AppError::new(codes::AI_GENERATION_FAILED, "Generation request failed")
                    .with_details(format!("model={model}; status={}", r.status())),
            ),
            Err(ureq::Error::Status(status, _)) => Err(
                AppError::new(codes::AI_GENERATION_FAILED, "Generation request failed")
                    .with_details(format!("model={model}; status={status}")),
            ),
            Err(e) => Err(
                AppError::new(codes::AI_GENERATION_FAILED, "Failed to call generation endpoint")
                    .with_details(e.to_string())
                    .with_retryable(true),
            ),
        }
    }
}
