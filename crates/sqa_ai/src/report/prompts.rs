use sqa_core::domain::ReferenceTexts;
use sqa_core::error::{codes, AppError};

const REPORT_TITLE_DIRECTIVE: &str = "The title should read like the title of a short scientific review: \
specific to the query, at most 12 words, no trailing punctuation, no quotation marks.";

/// Escape every non-ASCII character as `\uXXXX` (surrogate pairs above the BMP).
///
/// Non-ASCII characters only occur inside JSON strings, so this keeps the document valid.
fn escape_non_ascii(json: &str) -> String {
    let mut out = String::with_capacity(json.len());
    for c in json.chars() {
        if c.is_ascii() {
            out.push(c);
            continue;
        }
        let mut units = [0u16; 2];
        for unit in c.encode_utf16(&mut units) {
            out.push_str(&format!("\\u{:04x}", unit));
        }
    }
    out
}

/// Render references as 2-space-indented JSON in insertion order, ASCII-escaped.
pub fn references_json(references: &ReferenceTexts) -> Result<String, AppError> {
    let pretty = serde_json::to_string_pretty(references).map_err(|e| {
        AppError::new(
            codes::LITE_PROMPT_ENCODE_FAILED,
            "Failed to encode references for the prompt",
        )
        .with_details(e.to_string())
    })?;
    Ok(escape_non_ascii(&pretty))
}

/// Build the one-shot generation prompt.
///
/// The output contract spelled out here is exactly what `response::parse_sections`
/// and `response::filter_per_paper_summaries` rely on.
pub fn build_prompt(query: &str, references: &ReferenceTexts) -> Result<String, AppError> {
    let refs_json = references_json(references)?;
    Ok(format!(
        r#"You are writing a concise scientific report that answers a user's research question using ONLY the reference passages provided below.

Rules (non-negotiable):
1) Organize the answer into 3-7 sections. Start every section with a line of the form "SECTION; <section title>".
2) The line right after the section title MUST start with "TLDR;" followed by a one-sentence summary of the section.
3) After the TLDR line, write the section body as one or more paragraphs separated by blank lines. Lists are allowed.
4) Every claim supported by a reference MUST carry an inline citation copied exactly from the reference keys below, e.g. [12345678 | Smith and Doe | 2023 | Citations: 150].
5) If a claim comes from your own background knowledge rather than the references, mark it with (LLM Memory) instead of a citation.
6) Do not invent reference keys. Do not write anything before the first SECTION; line.

User query:
{query}

References (JSON object mapping reference key to passage text):
{refs_json}"#
    ))
}

/// Build the prompt asking for a report title from the query and section titles.
pub fn build_title_prompt(query: &str, section_titles: &[String]) -> String {
    let titles = section_titles
        .iter()
        .map(|t| format!("- {t}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!(
        r#"Generate a concise report title based on the user query and section titles provided.

{REPORT_TITLE_DIRECTIVE}

User query: {query}

Section titles:
{titles}

Output ONLY the title text, nothing else."#
    )
}
