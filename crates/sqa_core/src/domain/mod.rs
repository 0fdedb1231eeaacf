use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

/// Display-ready bibliographic string identifying one paper within a request,
/// e.g. `[12345678 | Smith and Doe | 2023 | Citations: 150]`.
pub type ReferenceKey = String;

/// Reference key -> prompt-facing passage text.
pub type ReferenceTexts = IndexMap<ReferenceKey, String>;

/// Reference key -> per-paper record.
pub type PerPaperData = IndexMap<ReferenceKey, PerPaperRecord>;

/// Reference key -> snippet metadata, in document order.
pub type QuotesMetadata = IndexMap<ReferenceKey, Vec<SnippetMetadata>>;

pub const DEFAULT_SECTION_TITLE: &str = "abstract";

/// Character range of one sentence inside the source PDF text.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SentenceOffset {
    pub start: u64,
    pub end: u64,
}

/// One retrieved text fragment, as produced by retrieval/reranking.
///
/// Notes:
/// - `char_offset` orders snippets within a paper; a missing offset sorts as 0.
/// - `section_title` falls back to [`DEFAULT_SECTION_TITLE`] when absent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceSnippet {
    pub text: String,
    #[serde(default)]
    pub char_offset: Option<u64>,
    #[serde(default)]
    pub section_title: Option<String>,
    #[serde(default)]
    pub pdf_hash: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sentence_offsets: Vec<SentenceOffset>,
}

impl SourceSnippet {
    pub fn new(text: impl Into<String>, char_offset: Option<u64>) -> Self {
        Self {
            text: text.into(),
            char_offset,
            section_title: None,
            pdf_hash: None,
            sentence_offsets: Vec::new(),
        }
    }

    pub fn section_title_or_default(&self) -> &str {
        self.section_title.as_deref().unwrap_or(DEFAULT_SECTION_TITLE)
    }
}

/// One row of the reranked input table: a paper and the snippets retrieved for it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PaperRow {
    pub reference_string: ReferenceKey,
    #[serde(rename = "abstract", default)]
    pub abstract_text: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sentences: Vec<SourceSnippet>,
}

/// Provenance entry for one snippet that contributed to a paper's combined quote.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SnippetMetadata {
    pub quote: String,
    pub section_title: String,
    pub pdf_hash: String,
    pub sentence_offsets: Vec<SentenceOffset>,
}

/// Per-paper data handed to the summary builder.
///
/// `inline_citations` is always created empty; it is filled in by downstream enrichment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PerPaperRecord {
    pub quote: String,
    pub inline_citations: IndexMap<String, serde_json::Value>,
}

impl PerPaperRecord {
    pub fn new(quote: impl Into<String>) -> Self {
        Self {
            quote: quote.into(),
            inline_citations: IndexMap::new(),
        }
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
