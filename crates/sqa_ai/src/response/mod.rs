//! Parsing of the one-shot generation reply.
//!
//! The model writes `SECTION;` blocks, each with a title line, a `TLDR;` summary line
//! and a body carrying inline citations of the form
//! `[corpus_id | Author et al. | year | Citations: N]`.

pub mod citations;
pub mod sections;

pub use citations::{extract_citations, filter_per_paper_summaries, CitationToken, ReconciledCitations};
pub use sections::{
    clean_summary_line, normalize_llm_memory, normalize_paragraph_breaks, parse_section_records,
    parse_sections, parse_sections_with, parse_title, strip_think_block, ParseOptions, SectionRecord,
};
