use once_cell::sync::Lazy;
use regex::{NoExpand, Regex};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use super::citations::CITATION_PATTERN;

pub const SECTION_MARKER: &str = "SECTION;";

static THINK_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<think>.*?</think>").unwrap());
static SECTION_SPLIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"SECTION;\s*").unwrap());
// (Model-Generated), (LLM Memory), [LLM-generated], ...
static MODEL_ANNOTATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s*[(\[][^)\]]*(?:LLM|Model)[^)\]]*[)\]]").unwrap());
static SOURCE_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\s*\(\d+\s+sources?\)").unwrap());
static LLM_MEMORY: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\(LLM Memory\)").unwrap());
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"([.!?])\n([A-Z])").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Year literal used when rewriting `(LLM Memory)` into a citation-shaped marker.
    pub memory_year: i32,
}

impl ParseOptions {
    pub fn with_memory_year(memory_year: i32) -> Self {
        Self { memory_year }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            memory_year: OffsetDateTime::now_utc().year(),
        }
    }
}

/// One report section after cleanup.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionRecord {
    pub title: String,
    /// The `TLDR;` line with provenance annotations removed. Empty when the section
    /// has no line after its title.
    pub summary: String,
    pub body: String,
}

impl SectionRecord {
    /// `title`, `summary` and `body` joined by newlines, as handed to the summary builder.
    pub fn to_section_text(&self) -> String {
        format!("{}\n{}\n{}", self.title, self.summary, self.body)
    }
}

/// Remove every `<think>...</think>` span and trim what remains.
pub fn strip_think_block(response: &str) -> String {
    THINK_BLOCK.replace_all(response, "").trim().to_string()
}

/// Extract a title from a title-generation reply.
pub fn parse_title(response: &str) -> String {
    strip_think_block(response)
}

/// Everything from the first section marker on, or `None` when there is no marker.
fn locate_sections(response: &str) -> Option<&str> {
    response.find(SECTION_MARKER).map(|start| &response[start..])
}

/// Split on section markers, dropping empty fragments.
fn split_sections(from_first_marker: &str) -> Vec<&str> {
    SECTION_SPLIT
        .split(from_first_marker)
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect()
}

/// Split off the first line. The remainder is trimmed; it is empty when there is no newline.
fn split_first_line(text: &str) -> (&str, &str) {
    match text.split_once('\n') {
        Some((first, rest)) => (first, rest.trim()),
        None => (text, ""),
    }
}

/// Drop model/LLM provenance annotations, source counts and inline citations from a
/// summary line.
pub fn clean_summary_line(line: &str) -> String {
    let cleaned = MODEL_ANNOTATION.replace_all(line, "");
    let cleaned = SOURCE_COUNT.replace_all(&cleaned, "");
    let cleaned = CITATION_PATTERN.replace_all(&cleaned, "");
    cleaned.trim().to_string()
}

/// Rewrite `(LLM Memory)` as `[LLM MEMORY | <year>]` so it reads like any other citation.
pub fn normalize_llm_memory(body: &str, year: i32) -> String {
    let marker = format!("[LLM MEMORY | {year}]");
    LLM_MEMORY.replace_all(body, NoExpand(&marker)).into_owned()
}

/// Turn `sentence end + single newline + capital letter` into a blank-line paragraph break.
///
/// Lower-case continuations and list items are left alone. A line ending in an
/// abbreviation (`U.S.`) followed by a capitalized line also gets a break.
pub fn normalize_paragraph_breaks(body: &str) -> String {
    PARAGRAPH_BREAK.replace_all(body, "${1}\n\n${2}").into_owned()
}

fn convert_section(raw_section: &str, options: &ParseOptions) -> SectionRecord {
    let (title, content) = split_first_line(raw_section);
    let (summary_line, body) = split_first_line(content);

    let body = normalize_llm_memory(body, options.memory_year);
    let body = normalize_paragraph_breaks(&body);

    SectionRecord {
        title: title.trim().to_string(),
        summary: clean_summary_line(summary_line),
        body,
    }
}

/// Parse a raw reply into section records, in source order.
///
/// A reply without any `SECTION;` marker yields no sections.
pub fn parse_section_records(response: &str, options: &ParseOptions) -> Vec<SectionRecord> {
    let cleaned = strip_think_block(response);
    let Some(from_first_marker) = locate_sections(&cleaned) else {
        return Vec::new();
    };
    split_sections(from_first_marker)
        .into_iter()
        .map(|raw| convert_section(raw, options))
        .collect()
}

/// Parse a raw reply into `(section_texts, section_titles)`.
pub fn parse_sections_with(response: &str, options: &ParseOptions) -> (Vec<String>, Vec<String>) {
    parse_section_records(response, options)
        .into_iter()
        .map(|record| {
            let text = record.to_section_text();
            (text, record.title)
        })
        .unzip()
}

/// [`parse_sections_with`] using the current year for `(LLM Memory)` markers.
pub fn parse_sections(response: &str) -> (Vec<String>, Vec<String>) {
    parse_sections_with(response, &ParseOptions::default())
}
