use sqa_core::error::codes;
use sqa_core::ingest::reranked::{parse_reranked_rows, preview_reranked_rows};

#[test]
fn parses_fixture_and_ignores_extra_columns() {
    let json = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../fixtures/lite/reranked_rows.json"
    ));
    let rows = parse_reranked_rows(json).expect("parse");
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[1].abstract_text, None);
    assert!(rows[4].sentences.is_empty());
    assert_eq!(rows[0].sentences[1].char_offset, Some(40));
    assert_eq!(rows[5].sentences[1].char_offset, None);
    assert_eq!(rows[5].sentences[1].section_title_or_default(), "abstract");

    let preview = preview_reranked_rows(&rows);
    assert_eq!(preview.row_count, 6);
    assert_eq!(preview.rows_with_snippets, 4);
    assert_eq!(preview.abstract_only_rows, 1);
    assert_eq!(preview.empty_rows, 1);
    assert_eq!(preview.snippet_count, 6);
}

#[test]
fn missing_sentences_field_defaults_to_empty() {
    let rows = parse_reranked_rows(
        r#"[{"reference_string": "[5 | Poe | 2018 | Citations: 3]", "abstract": "Only an abstract."}]"#,
    )
    .expect("parse");
    assert_eq!(rows.len(), 1);
    assert!(rows[0].sentences.is_empty());
    assert_eq!(rows[0].abstract_text.as_deref(), Some("Only an abstract."));
}

#[test]
fn malformed_json_is_a_structured_error() {
    let err = parse_reranked_rows("{not json").unwrap_err();
    assert_eq!(err.code, codes::INGEST_ROWS_INVALID);
    assert!(err.details.unwrap_or_default().contains("line=1"));

    let err = parse_reranked_rows(r#"[{"abstract": "no key"}]"#).unwrap_err();
    assert_eq!(err.code, codes::INGEST_ROWS_INVALID);
}
