use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use sqa_core::domain::{PaperRow, PerPaperData, QuotesMetadata};
use sqa_core::error::AppError;
use sqa_core::ingest::reranked::preview_reranked_rows;
use sqa_core::references::prepare_references_data;

use crate::config::LitePipelineConfig;
use crate::llm::{Llm, ModelOptions, TokenUsage};
use crate::response::{filter_per_paper_summaries, parse_section_records, parse_title, SectionRecord};

pub mod prompts;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CostSummary {
    pub total_cost: f64,
    /// The generating model, repeated once per section.
    pub models: Vec<String>,
    pub usage: TokenUsage,
}

/// Everything one generation request produces, ready for the summary builder.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LiteReport {
    /// Empty when there were no sections or title generation failed.
    pub report_title: String,
    pub sections: Vec<SectionRecord>,
    pub section_texts: Vec<String>,
    pub section_titles: Vec<String>,
    pub per_paper_summaries: PerPaperData,
    pub quotes_metadata: QuotesMetadata,
    pub cost: CostSummary,
    pub prompt_sha256: String,
}

/// Ask the model for a report title. Never fails: any error yields an empty title.
pub fn generate_title(
    llm: &dyn Llm,
    model: &str,
    options: &ModelOptions,
    query: &str,
    section_titles: &[String],
) -> String {
    if section_titles.is_empty() {
        return String::new();
    }
    let prompt = prompts::build_title_prompt(query, section_titles);
    match llm.generate(model, &prompt, options) {
        Ok(result) => parse_title(&result.content),
        Err(e) => {
            tracing::warn!(code = %e.code, error = %e.message, "failed to generate report title");
            String::new()
        }
    }
}

/// Generate a report with a single model call and reconcile its citations.
///
/// Only configuration, the model readiness check, prompt encoding and the main model
/// call can fail. A reply the parser cannot structure produces a report with no sections.
pub fn generate_report(
    llm: &dyn Llm,
    config: &LitePipelineConfig,
    query: &str,
    rows: &[PaperRow],
) -> Result<LiteReport, AppError> {
    config.validate()?;
    llm.check()?;

    let preview = preview_reranked_rows(rows);
    tracing::debug!(
        rows = preview.row_count,
        with_snippets = preview.rows_with_snippets,
        abstract_only = preview.abstract_only_rows,
        empty = preview.empty_rows,
        snippets = preview.snippet_count,
        "preparing references"
    );
    let prepared = prepare_references_data(rows);
    let prompt = prompts::build_prompt(query, &prepared.references)?;
    let prompt_sha256 = hex::encode(Sha256::digest(prompt.as_bytes()));
    tracing::info!(
        references = prepared.len(),
        prompt_sha256 = %prompt_sha256,
        "built lite generation prompt"
    );

    let completion = llm.generate(&config.model, &prompt, &config.options)?;

    let sections = parse_section_records(&completion.content, &config.parse_options());
    let section_texts: Vec<String> = sections.iter().map(SectionRecord::to_section_text).collect();
    let section_titles: Vec<String> = sections.iter().map(|s| s.title.clone()).collect();
    tracing::info!(sections = sections.len(), "parsed sections from response");

    let report_title = generate_title(llm, &config.model, &config.options, query, &section_titles);

    let reconciled =
        filter_per_paper_summaries(&section_texts, &prepared.per_paper, &prepared.quotes_metadata);

    let cost = CostSummary {
        total_cost: completion.cost,
        models: vec![config.model.clone(); section_texts.len()],
        usage: completion.usage,
    };

    Ok(LiteReport {
        report_title,
        sections,
        section_texts,
        section_titles,
        per_paper_summaries: reconciled.per_paper_summaries,
        quotes_metadata: reconciled.quotes_metadata,
        cost,
        prompt_sha256,
    })
}
