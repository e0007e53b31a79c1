//! Scratchpad Integration Tests
//!
//! Manual scratchpad commands together with the core store and extractor.

use scratchpad_chat::commands::{
    add_scratchpad_item, delete_scratchpad_item, edit_scratchpad_item, list_scratchpad,
    list_scratchpad_by_kind, AddItemRequest, EditItemRequest,
};
use scratchpad_chat::SessionState;
use scratchpad_chat_core::{extract_code_blocks, extract_tables, ItemContent, ItemKind};

fn add(session: &mut SessionState, name: &str, kind: ItemKind, content: &str) -> Option<String> {
    add_scratchpad_item(
        session,
        AddItemRequest {
            name: name.to_string(),
            kind,
            content: content.to_string(),
            language: None,
        },
    )
    .data
}

#[test]
fn test_manual_names_collide_with_suffixes() {
    let mut session = SessionState::new();
    assert_eq!(add(&mut session, "x", ItemKind::Text, "1").as_deref(), Some("x"));
    assert_eq!(add(&mut session, "x", ItemKind::Text, "2").as_deref(), Some("x_1"));
    assert_eq!(add(&mut session, "x", ItemKind::Table, "3").as_deref(), Some("x_2"));
}

#[test]
fn test_sanitized_manual_name() {
    let mut session = SessionState::new();
    assert_eq!(
        add(&mut session, "Q3 results (final)!", ItemKind::Text, "body").as_deref(),
        Some("Q3 results final")
    );
}

#[test]
fn test_punctuation_only_name_falls_back_to_generated() {
    let mut session = SessionState::new();
    let name = add(&mut session, "!!!", ItemKind::Code, "x = 1").unwrap();
    assert!(name.starts_with("code_"));
}

#[test]
fn test_edit_code_changes_language_only_when_given() {
    let mut session = SessionState::new();
    add(&mut session, "snippet", ItemKind::Code, "x = 1");

    edit_scratchpad_item(
        &mut session,
        EditItemRequest {
            name: "snippet".to_string(),
            content: "const x = 1;".to_string(),
            language: Some("JSX".to_string()),
        },
    );
    let item = session.scratchpad.get("snippet").unwrap().clone();
    assert_eq!(item.content, ItemContent::code("javascript", "const x = 1;"));

    edit_scratchpad_item(
        &mut session,
        EditItemRequest {
            name: "snippet".to_string(),
            content: "const y = 2;".to_string(),
            language: None,
        },
    );
    assert_eq!(
        session.scratchpad.get("snippet").unwrap().content,
        ItemContent::code("javascript", "const y = 2;")
    );
    assert_eq!(session.scratchpad.get("snippet").unwrap().created_at, item.created_at);
}

#[test]
fn test_delete_then_reuse_name() {
    let mut session = SessionState::new();
    add(&mut session, "x", ItemKind::Text, "1");
    add(&mut session, "x", ItemKind::Text, "2");

    let removed = delete_scratchpad_item(&mut session, "x").data.unwrap();
    assert_eq!(removed.content, ItemContent::text("1"));
    assert_eq!(add(&mut session, "x", ItemKind::Text, "3").as_deref(), Some("x"));

    let texts = list_scratchpad_by_kind(&session, ItemKind::Text).data.unwrap();
    let names: Vec<&str> = texts.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["x_1", "x"]);
}

#[test]
fn test_grouped_view_buckets() {
    let mut session = SessionState::new();
    add(&mut session, "t", ItemKind::Table, "| a |\n| - |\n| 1 |");
    add(&mut session, "c", ItemKind::Code, "ls");
    add(&mut session, "n", ItemKind::Text, "note");

    let sections = list_scratchpad(&session).data.unwrap();
    assert!(sections.charts.is_empty());
    assert_eq!(sections.code[0].name, "c");
    assert_eq!(sections.tables[0].name, "t");
    assert_eq!(sections.notes[0].name, "n");
}

#[test]
fn test_extractors_on_reference_inputs() {
    assert!(extract_code_blocks("no fences here").is_empty());

    let blocks = extract_code_blocks("```py\nx=1\n```");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].language, "python");
    assert_eq!(blocks[0].code, "x=1");

    let table = "| A | B |\n| - | - |\n| 1 | 2 |\n";
    assert_eq!(extract_tables(table), vec![table.trim().to_string()]);
    assert!(extract_tables("| A | B |\n| 1 | 2 |\n").is_empty());
}
