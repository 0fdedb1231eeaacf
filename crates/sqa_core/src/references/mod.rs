use serde::{Deserialize, Serialize};

use crate::domain::{
    PaperRow, PerPaperData, PerPaperRecord, QuotesMetadata, ReferenceTexts, SnippetMetadata,
    SourceSnippet, DEFAULT_SECTION_TITLE,
};
use crate::normalize::quotes::{join_quotes, normalize_snippet_quote};

/// The three aligned mappings built from the reranked table.
///
/// All three always share the same key set, in input row order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PreparedReferences {
    /// Reference key -> passage text interpolated into the prompt.
    pub references: ReferenceTexts,
    /// Reference key -> combined normalized quote (and empty inline citations).
    pub per_paper: PerPaperData,
    /// Reference key -> one metadata entry per contributing snippet.
    pub quotes_metadata: QuotesMetadata,
}

impl PreparedReferences {
    pub fn len(&self) -> usize {
        self.references.len()
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }
}

struct Passage {
    text: String,
    combined_quote: String,
    snippets: Vec<SnippetMetadata>,
}

fn snippet_metadata(snippet: &SourceSnippet) -> SnippetMetadata {
    SnippetMetadata {
        quote: normalize_snippet_quote(&snippet.text),
        section_title: snippet.section_title_or_default().to_string(),
        pdf_hash: snippet.pdf_hash.clone().unwrap_or_default(),
        sentence_offsets: snippet.sentence_offsets.clone(),
    }
}

fn passage_from_snippets(snippets: &[SourceSnippet]) -> Passage {
    // Stable: snippets sharing an offset keep their input order.
    let mut ordered: Vec<&SourceSnippet> = snippets.iter().collect();
    ordered.sort_by_key(|s| s.char_offset.unwrap_or(0));

    let text = ordered
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    let metadata: Vec<SnippetMetadata> = ordered.into_iter().map(snippet_metadata).collect();
    let quotes: Vec<&str> = metadata.iter().map(|m| m.quote.as_str()).collect();
    let combined_quote = join_quotes(&quotes);

    Passage {
        text,
        combined_quote,
        snippets: metadata,
    }
}

fn passage_from_abstract(abstract_text: &str) -> Passage {
    let combined_quote = normalize_snippet_quote(abstract_text);
    Passage {
        text: abstract_text.to_string(),
        snippets: vec![SnippetMetadata {
            quote: combined_quote.clone(),
            section_title: DEFAULT_SECTION_TITLE.to_string(),
            pdf_hash: String::new(),
            sentence_offsets: Vec::new(),
        }],
        combined_quote,
    }
}

fn build_passage(row: &PaperRow) -> Option<Passage> {
    let passage = if row.sentences.is_empty() {
        passage_from_abstract(row.abstract_text.as_deref().unwrap_or(""))
    } else {
        passage_from_snippets(&row.sentences)
    };
    if passage.text.trim().is_empty() {
        return None;
    }
    Some(passage)
}

/// Build the reference set, per-paper records and quote metadata for one request.
///
/// Contract:
/// - Rows are visited in order; the first row for a reference key wins and later rows
///   with the same key are skipped without merging.
/// - Snippets are ordered by `char_offset`. The prompt text joins raw snippet texts with
///   a space; the combined quote joins their normalized forms with the quote separator,
///   so splitting it yields exactly the metadata quotes.
/// - Rows without snippets fall back to the abstract; rows with neither are omitted
///   from all three mappings.
pub fn prepare_references_data(rows: &[PaperRow]) -> PreparedReferences {
    let mut out = PreparedReferences::default();

    for row in rows {
        let key = row.reference_string.as_str();
        if out.references.contains_key(key) {
            tracing::debug!(reference = key, "skipping duplicate reference row");
            continue;
        }

        let Some(passage) = build_passage(row) else {
            tracing::debug!(reference = key, "row has no snippet or abstract text");
            continue;
        };

        out.references.insert(key.to_string(), passage.text);
        out.per_paper
            .insert(key.to_string(), PerPaperRecord::new(passage.combined_quote));
        out.quotes_metadata.insert(key.to_string(), passage.snippets);
    }

    out
}
