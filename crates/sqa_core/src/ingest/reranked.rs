use serde::{Deserialize, Serialize};

use crate::domain::PaperRow;
use crate::error::{codes, AppError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RerankedPreview {
    pub row_count: usize,
    pub rows_with_snippets: usize,
    pub abstract_only_rows: usize,
    pub empty_rows: usize,
    pub snippet_count: usize,
}

/// Decode the records-oriented JSON dump of the reranked table.
///
/// Unknown columns are ignored. `null` abstracts and snippet lists are treated as absent.
pub fn parse_reranked_rows(json: &str) -> Result<Vec<PaperRow>, AppError> {
    serde_json::from_str(json).map_err(|e| {
        AppError::new(codes::INGEST_ROWS_INVALID, "Failed to decode reranked rows")
            .with_details(format!("line={}; column={}; err={e}", e.line(), e.column()))
    })
}

/// Summarize decoded rows without building references.
pub fn preview_reranked_rows(rows: &[PaperRow]) -> RerankedPreview {
    let mut preview = RerankedPreview {
        row_count: rows.len(),
        rows_with_snippets: 0,
        abstract_only_rows: 0,
        empty_rows: 0,
        snippet_count: 0,
    };
    for row in rows {
        if !row.sentences.is_empty() {
            preview.rows_with_snippets += 1;
            preview.snippet_count += row.sentences.len();
        } else if row
            .abstract_text
            .as_deref()
            .is_some_and(|a| !a.trim().is_empty())
        {
            preview.abstract_only_rows += 1;
        } else {
            preview.empty_rows += 1;
        }
    }
    preview
}
