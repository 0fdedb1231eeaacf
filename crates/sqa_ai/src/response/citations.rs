use std::collections::{HashMap, HashSet};

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use sqa_core::domain::{PerPaperData, QuotesMetadata};
use sqa_core::normalize::quotes::ascii_fold;

// [corpus_id | Author et al. | year | Citations: N]
pub(crate) static CITATION_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\s*\[(\d+)\s*\|\s*([^|]+?)\s*\|\s*(\d+)\s*\|\s*Citations:\s*(\d+)\]").unwrap()
});

/// An inline citation found in generated text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CitationToken {
    pub corpus_id: String,
    pub author: String,
    pub year: String,
    pub citation_count: String,
}

impl CitationToken {
    /// Rebuild the reference key this citation points at, folded to ASCII.
    pub fn canonical_key(&self) -> String {
        ascii_fold(&format!(
            "[{} | {} | {} | Citations: {}]",
            self.corpus_id,
            self.author.trim(),
            self.year,
            self.citation_count
        ))
    }
}

/// Citations in order of first appearance, one per corpus id.
pub fn extract_citations(text: &str) -> Vec<CitationToken> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for caps in CITATION_PATTERN.captures_iter(text) {
        let corpus_id = caps.get(1).map_or("", |m| m.as_str());
        if !seen.insert(corpus_id) {
            continue;
        }
        out.push(CitationToken {
            corpus_id: corpus_id.to_string(),
            author: caps.get(2).map_or("", |m| m.as_str()).to_string(),
            year: caps.get(3).map_or("", |m| m.as_str()).to_string(),
            citation_count: caps.get(4).map_or("", |m| m.as_str()).to_string(),
        });
    }
    out
}

/// Per-paper records and quote metadata restricted to the papers the reply cites.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReconciledCitations {
    pub per_paper_summaries: PerPaperData,
    pub quotes_metadata: QuotesMetadata,
}

impl ReconciledCitations {
    pub fn len(&self) -> usize {
        self.per_paper_summaries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_paper_summaries.is_empty()
    }
}

/// Keep only the prepared papers that the section texts actually cite.
///
/// Contract:
/// - Citations are deduplicated by corpus id; the first occurrence decides the key.
/// - Keys are compared after ASCII folding on both sides, so `Müller` in the source
///   metadata matches `Muller` written by the model. Folding only the citation would
///   leave every non-ASCII prepared key unreachable; folding the prepared keys too is
///   a deliberate widening of that lookup. Output keys are always the prepared keys.
/// - Citations with no prepared record are dropped without error.
/// - Both outputs share one key set, ordered by first citation.
pub fn filter_per_paper_summaries(
    section_texts: &[String],
    per_paper: &PerPaperData,
    quotes_metadata: &QuotesMetadata,
) -> ReconciledCitations {
    let mut folded_keys: HashMap<String, &str> = HashMap::new();
    for key in per_paper.keys() {
        folded_keys.entry(ascii_fold(key)).or_insert(key.as_str());
    }

    let all_text = section_texts.join("\n");
    let mut out = ReconciledCitations::default();

    for citation in extract_citations(&all_text) {
        let canonical = citation.canonical_key();
        let Some(&key) = folded_keys.get(&canonical) else {
            tracing::debug!(citation = %canonical, "dropping citation with no prepared reference");
            continue;
        };
        let (Some(record), Some(metadata)) = (per_paper.get(key), quotes_metadata.get(key)) else {
            tracing::debug!(reference = key, "prepared reference is missing quote metadata");
            continue;
        };
        out.per_paper_summaries.insert(key.to_string(), record.clone());
        out.quotes_metadata.insert(key.to_string(), metadata.clone());
    }

    tracing::info!(
        citations = out.len(),
        "built per-paper summaries for cited references"
    );
    out
}
