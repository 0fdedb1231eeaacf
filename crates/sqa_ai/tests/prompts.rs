use pretty_assertions::assert_eq;
use sqa_ai::report::prompts::{build_prompt, build_title_prompt, references_json};
use sqa_core::domain::ReferenceTexts;
use sqa_core::ingest::reranked::parse_reranked_rows;
use sqa_core::references::prepare_references_data;

#[test]
fn references_json_matches_two_space_ascii_layout() {
    let mut refs = ReferenceTexts::new();
    refs.insert("[2 | B | 2020 | Citations: 1]".to_string(), "second \u{2014} text".to_string());
    refs.insert("[1 | A | 2019 | Citations: 0]".to_string(), "first \"quoted\"".to_string());

    let json = references_json(&refs).expect("json");
    assert_eq!(
        json,
        "{\n  \"[2 | B | 2020 | Citations: 1]\": \"second \\u2014 text\",\n  \"[1 | A | 2019 | Citations: 0]\": \"first \\\"quoted\\\"\"\n}"
    );
    assert_eq!(references_json(&ReferenceTexts::new()).expect("json"), "{}");
}

#[test]
fn prompt_embeds_query_and_references_in_row_order() {
    let json = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../../fixtures/lite/reranked_rows.json"
    ));
    let query = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/../../fixtures/lite/query.txt")).trim();
    let prepared = prepare_references_data(&parse_reranked_rows(json).expect("rows"));

    let prompt = build_prompt(query, &prepared.references).expect("prompt");
    assert!(prompt.contains(&format!("User query:\n{query}\n")));
    assert!(prompt.contains("SECTION;"));
    assert!(prompt.contains("TLDR;"));
    assert!(prompt.contains("\"[215416146 | M\\u00fcller and Chen | 2020 | Citations: 412]\""));
    assert!(prompt.is_ascii());

    let bui = prompt.find("[258999746 | Bui et al.").expect("bui");
    let vit = prompt.find("[225039882 | Dosovitskiy").expect("vit");
    assert!(bui < vit);
    assert!(!prompt.contains("Empty et al."));
    assert!(prompt.ends_with("}"));

    // The JSON tail parses back to the same references.
    let tail = &prompt[prompt.find("{\n").expect("json start")..];
    let decoded: ReferenceTexts = serde_json::from_str(tail).expect("decode");
    assert_eq!(decoded, prepared.references);
}

#[test]
fn title_prompt_lists_sections() {
    let prompt = build_title_prompt(
        "How do transformers work?",
        &["Attention".to_string(), "Scaling".to_string()],
    );
    assert!(prompt.starts_with("Generate a concise report title"));
    assert!(prompt.contains("User query: How do transformers work?"));
    assert!(prompt.contains("Section titles:\n- Attention\n- Scaling\n"));
    assert!(prompt.ends_with("Output ONLY the title text, nothing else."));
}
