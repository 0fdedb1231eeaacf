use std::fs;

use sqa_ai::config::{LitePipelineConfig, DEFAULT_OLLAMA_BASE_URL, DEFAULT_TIMEOUT_SECS};
use sqa_ai::llm::OllamaLlm;
use sqa_core::error::codes;
use tempfile::tempdir;

#[test]
fn unknown_keys_become_model_options() {
    let config = LitePipelineConfig::from_json_str(
        r#"{"model": "qwen2.5:14b", "temperature": 0.1, "num_ctx": 16384}"#,
    )
    .expect("config");
    assert_eq!(config.model, "qwen2.5:14b");
    assert_eq!(config.ollama_base_url, DEFAULT_OLLAMA_BASE_URL);
    assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    assert_eq!(config.memory_year, None);
    assert_eq!(config.options.len(), 2);
    assert_eq!(config.options["num_ctx"], serde_json::json!(16384));
}

#[test]
fn model_is_required() {
    let err = LitePipelineConfig::from_json_str(r#"{"temperature": 0.1}"#).unwrap_err();
    assert_eq!(err.code, codes::LITE_CONFIG_INVALID);

    let err = LitePipelineConfig::from_json_str("not json").unwrap_err();
    assert_eq!(err.code, codes::LITE_CONFIG_INVALID);
}

#[test]
fn rejects_out_of_range_values() {
    let err = LitePipelineConfig::from_json_str(r#"{"model": "m", "timeout_secs": 0}"#).unwrap_err();
    assert_eq!(err.code, codes::LITE_CONFIG_INVALID);

    let err = LitePipelineConfig::from_json_str(r#"{"model": "m", "memory_year": 24}"#).unwrap_err();
    assert_eq!(err.code, codes::LITE_CONFIG_INVALID);

    let err = LitePipelineConfig::from_json_str(
        r#"{"model": "m", "ollama_base_url": "https://api.example.com"}"#,
    )
    .unwrap_err();
    assert_eq!(err.code, codes::AI_REMOTE_NOT_ALLOWED);
}

#[test]
fn memory_year_flows_into_parse_options() {
    let config = LitePipelineConfig::new("m").with_memory_year(2027);
    assert_eq!(config.parse_options().memory_year, 2027);
}

#[test]
fn loads_from_file_and_builds_client() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("lite.json");
    fs::write(
        &path,
        r#"{"model": "llama3.1:8b", "ollama_base_url": "http://127.0.0.1:11500/", "timeout_secs": 30}"#,
    )
    .unwrap();

    let config = LitePipelineConfig::from_path(&path).expect("config");
    let llm = OllamaLlm::from_config(&config).expect("llm");
    assert_eq!(llm.client().base_url(), "http://127.0.0.1:11500");
    assert_eq!(llm.client().timeout().as_secs(), 30);

    let err = LitePipelineConfig::from_path(&dir.path().join("missing.json")).unwrap_err();
    assert_eq!(err.code, codes::LITE_CONFIG_INVALID);
}
