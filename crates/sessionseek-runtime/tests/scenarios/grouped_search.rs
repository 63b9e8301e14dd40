//! Grouped Search Tests
//!
//! Verifies session grouping, ranked order and row content for
//! single-category and all-category searches.

use anyhow::Result;
use sessionseek_testing::assertions::assert_ranked_order;
use sessionseek_testing::{TestWorld, fixtures};
use sessionseek_types::{MatchCategory, MatchDetail, Role, SearchFilters, SearchScope};

#[test]
fn test_single_message_match() -> Result<()> {
    let world = fixtures::hello_world();

    let results = world.search().search_grouped_by_session(
        "Hello",
        SearchScope::Messages,
        &SearchFilters::new(),
        3,
        0,
    )?;

    assert_eq!(results.session_order, vec!["s1"]);
    assert!(!results.has_more);
    assert_eq!(results.total_sessions, 1);

    let rows = results.get("s1").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, MatchCategory::Message);
    assert_eq!(rows[0].project_name, "Project One");
    assert_eq!(rows[0].detail, MatchDetail::Message { role: Role::User });
    assert_eq!(rows[0].snippet, "<mark>Hello</mark> world");
    Ok(())
}

#[test]
fn test_all_scope_ranks_by_latest_match_across_categories() -> Result<()> {
    let world = fixtures::two_projects();

    let results = world.search().search_grouped_by_session(
        "parser",
        SearchScope::All,
        &SearchFilters::new(),
        10,
        0,
    )?;

    // alpha-2 and beta-1 tie on their latest match; the lower id goes first
    assert_eq!(
        results.session_order,
        vec!["beta-2", "alpha-2", "beta-1", "alpha-1"]
    );
    assert_eq!(results.total_sessions, 4);
    assert!(!results.has_more);
    assert_ranked_order(&results)?;

    let alpha_1: Vec<MatchCategory> = results
        .get("alpha-1")
        .unwrap()
        .iter()
        .map(|row| row.category)
        .collect();
    assert_eq!(
        alpha_1,
        vec![
            MatchCategory::ToolInput,
            MatchCategory::Message,
            MatchCategory::Message
        ]
    );
    Ok(())
}

#[test]
fn test_scope_narrows_categories() -> Result<()> {
    let world = fixtures::two_projects();
    let search = world.search();
    let filters = SearchFilters::new();

    let messages =
        search.search_grouped_by_session("parser", SearchScope::Messages, &filters, 10, 0)?;
    assert_eq!(messages.session_order, vec!["beta-1", "alpha-2", "alpha-1"]);
    assert!(
        messages
            .iter()
            .flat_map(|(_, rows)| rows)
            .all(|row| row.category == MatchCategory::Message)
    );

    let inputs =
        search.search_grouped_by_session("parser", SearchScope::ToolInputs, &filters, 10, 0)?;
    assert_eq!(inputs.session_order, vec!["alpha-2", "alpha-1"]);

    let outputs =
        search.search_grouped_by_session("parser", SearchScope::ToolResults, &filters, 10, 0)?;
    assert_eq!(outputs.session_order, vec!["beta-2"]);
    let row = &outputs.get("beta-2").unwrap()[0];
    assert_eq!(
        row.detail,
        MatchDetail::Tool {
            tool_name: "Bash".to_string(),
            is_error: true
        }
    );
    Ok(())
}

#[test]
fn test_tool_payload_is_truncated() -> Result<()> {
    let long_result = format!("error {}", "x".repeat(500));
    let world = TestWorld::new()
        .with_project("p1", "Project One")
        .with_session("s1", "p1")
        .with_tool_use("s1", "Bash", "make", Some(&long_result), "2025-01-01T00:00:00");

    let results = world.search().search_grouped_by_session(
        "error",
        SearchScope::ToolResults,
        &SearchFilters::new(),
        3,
        0,
    )?;

    let snippet = &results.get("s1").unwrap()[0].snippet;
    assert!(snippet.ends_with("...(truncated)"));
    assert!(snippet.chars().count() < long_result.chars().count());
    Ok(())
}

#[test]
fn test_fallback_snippet_without_native_support() -> Result<()> {
    let world = fixtures::hello_world();
    let world = world.with_config("[index]\nnative_snippets = false\nnative_rank = false\n");
    let workspace = sessionseek_runtime::SessionSeek::open(world.data_dir())?;

    let results = workspace.search().search_grouped_by_session(
        "world",
        SearchScope::Messages,
        &SearchFilters::new(),
        3,
        0,
    )?;

    let row = &results.get("s1").unwrap()[0];
    assert!(row.snippet.contains("<mark>world</mark>"));
    assert_eq!(row.rank, 0.0);
    Ok(())
}

#[test]
fn test_reingested_record_is_not_duplicated() -> Result<()> {
    let world = fixtures::hello_world();
    world.workspace().corpus().insert_or_update_message(
        &sessionseek_index::MessageRecord {
            session_id: "s1".to_string(),
            message_index: 0,
            role: Role::User,
            content: "Hello again world".to_string(),
            timestamp: Some("2025-01-01T10:00:00".to_string()),
        },
    )?;

    let results = world.search().search_grouped_by_session(
        "Hello",
        SearchScope::All,
        &SearchFilters::new(),
        3,
        0,
    )?;
    let rows = results.get("s1").unwrap();
    assert_eq!(rows.len(), 1);
    assert!(rows[0].snippet.contains("again"));
    Ok(())
}
