//! Error Taxonomy Tests
//!
//! Verifies that each failure surfaces as its own kind with enough
//! context to act on, and that nothing is swallowed.

use anyhow::Result;
use sessionseek_runtime::{Config, ErrorKind, SearchOps};
use sessionseek_testing::fixtures;
use sessionseek_types::{SearchFilters, SearchScope};
use std::sync::Arc;

#[test]
fn test_malformed_query_in_every_scope() -> Result<()> {
    let world = fixtures::two_projects();
    let search = world.search();

    for scope in [
        SearchScope::All,
        SearchScope::Messages,
        SearchScope::ToolInputs,
        SearchScope::ToolResults,
    ] {
        let err = search
            .search_grouped_by_session("unmatched\"quote", scope, &SearchFilters::new(), 3, 0)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedQuerySyntax, "{scope:?}");
        assert_eq!(err.offending_query(), Some("unmatched\"quote"));
        assert!(err.to_string().contains("unmatched\"quote"));
        assert!(err.to_string().contains("AND, OR, NOT"));
    }
    Ok(())
}

#[test]
fn test_malformed_query_on_auxiliary_operations() {
    let world = fixtures::two_projects();
    let search = world.search();

    let flat = search
        .search_records("AND", SearchScope::All, &SearchFilters::new(), None, 10, 0)
        .unwrap_err();
    assert_eq!(flat.kind(), ErrorKind::MalformedQuerySyntax);

    let count = search
        .count_matches_in_session("(parser", "alpha-1", SearchScope::All, &SearchFilters::new())
        .unwrap_err();
    assert_eq!(count.kind(), ErrorKind::MalformedQuerySyntax);
    assert_eq!(count.offending_query(), Some("(parser"));
}

#[test]
fn test_malformed_query_fails_identically_on_retry() {
    let world = fixtures::hello_world();
    let search = world.search();

    let first = search
        .search_grouped_by_session("\"open", SearchScope::All, &SearchFilters::new(), 3, 0)
        .unwrap_err();
    let second = search
        .search_grouped_by_session("\"open", SearchScope::All, &SearchFilters::new(), 3, 0)
        .unwrap_err();
    assert_eq!(first.kind(), second.kind());
    assert_eq!(first.to_string(), second.to_string());
}

#[test]
fn test_invalid_pagination_parameters() {
    let world = fixtures::hello_world();
    let search = world.search();
    let filters = SearchFilters::new();

    for (per_page, page) in [(0, 0), (-1, 0), (3, -1), (i64::MAX, 0), (2, i64::MAX)] {
        let err = search
            .search_grouped_by_session("Hello", SearchScope::All, &filters, per_page, page)
            .unwrap_err();
        assert_eq!(
            err.kind(),
            ErrorKind::InvalidPaginationParameters,
            "per_page={per_page} page={page}"
        );
    }

    let err = search
        .search_records("Hello", SearchScope::All, &filters, None, 10, -5)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPaginationParameters);
    assert!(err.to_string().contains("-5"));
}

#[test]
fn test_pagination_is_checked_before_the_index() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let ops = SearchOps::new(
        temp_dir.path().join("missing.db"),
        Arc::new(Config::default()),
    );

    let err = ops
        .search_grouped_by_session("\"broken", SearchScope::All, &SearchFilters::new(), 0, 0)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidPaginationParameters);
}

#[test]
fn test_unknown_scope() {
    let world = fixtures::hello_world();

    let err = world
        .search()
        .search_grouped_by_scope_name("Hello", "attachments", &SearchFilters::new(), 3, 0)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnknownScope);
    assert!(err.to_string().contains("attachments"));
}

#[test]
fn test_scope_names_are_accepted() -> Result<()> {
    let world = fixtures::hello_world();

    let results = world.search().search_grouped_by_scope_name(
        "Hello",
        "messages",
        &SearchFilters::new(),
        3,
        0,
    )?;
    assert_eq!(results.total_sessions, 1);
    Ok(())
}

#[test]
fn test_missing_index_is_unavailable() {
    let temp_dir = tempfile::TempDir::new().unwrap();
    let ops = SearchOps::new(
        temp_dir.path().join("missing.db"),
        Arc::new(Config::default()),
    );

    let err = ops
        .search_grouped_by_session("Hello", SearchScope::All, &SearchFilters::new(), 3, 0)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IndexUnavailable);
    assert!(err.to_string().contains("missing.db"));

    let err = ops.list_tool_names().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IndexUnavailable);
}

#[test]
fn test_unparseable_time_bound() {
    let world = fixtures::hello_world();

    let err = world
        .search()
        .search_grouped_by_session(
            "Hello",
            SearchScope::All,
            &SearchFilters::new().since("last week"),
            3,
            0,
        )
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidFilter);
}
