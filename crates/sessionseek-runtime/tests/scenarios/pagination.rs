//! Pagination Tests
//!
//! Verifies over-fetch-by-one `has_more` signalling, exhaustive page
//! coverage and the accuracy of `total_sessions`.

use anyhow::Result;
use sessionseek_testing::assertions::{assert_pages_partition, assert_ranked_order, collect_pages};
use sessionseek_testing::{TestWorld, fixtures};
use sessionseek_types::{Role, SearchFilters, SearchScope};
use std::collections::BTreeSet;

#[test]
fn test_five_sessions_three_per_page() -> Result<()> {
    let world = fixtures::error_results(5);
    let search = world.search();
    let filters = SearchFilters::new();

    let first = search.search_grouped_by_session("error", SearchScope::ToolResults, &filters, 3, 0)?;
    assert_eq!(first.session_order, vec!["s04", "s03", "s02"]);
    assert!(first.has_more);
    assert_eq!(first.total_sessions, 5);

    let second =
        search.search_grouped_by_session("error", SearchScope::ToolResults, &filters, 3, 1)?;
    assert_eq!(second.session_order, vec!["s01", "s00"]);
    assert!(!second.has_more);
    assert_eq!(second.total_sessions, 5);
    Ok(())
}

#[test]
fn test_page_size_equal_to_total_has_no_more() -> Result<()> {
    let world = fixtures::error_results(4);

    let results = world.search().search_grouped_by_session(
        "error",
        SearchScope::All,
        &SearchFilters::new(),
        4,
        0,
    )?;
    assert_eq!(results.len(), 4);
    assert!(!results.has_more);
    assert_eq!(results.total_sessions, 4);
    Ok(())
}

#[test]
fn test_page_past_the_end_is_empty_but_counted() -> Result<()> {
    let world = fixtures::error_results(4);

    let results = world.search().search_grouped_by_session(
        "error",
        SearchScope::All,
        &SearchFilters::new(),
        3,
        5,
    )?;
    assert!(results.is_empty());
    assert!(!results.has_more);
    assert_eq!(results.total_sessions, 4);
    Ok(())
}

#[test]
fn test_empty_corpus() -> Result<()> {
    let world = TestWorld::new();

    let results = world.search().search_grouped_by_session(
        "anything",
        SearchScope::All,
        &SearchFilters::new(),
        3,
        0,
    )?;
    assert!(results.is_empty());
    assert!(!results.has_more);
    assert_eq!(results.total_sessions, 0);
    Ok(())
}

#[test]
fn test_exhaustive_pagination_for_every_page_size() -> Result<()> {
    let world = fixtures::error_results(11);
    let search = world.search();
    let filters = SearchFilters::new();

    let expected: Vec<String> = (0..11).rev().map(|i| format!("s{:02}", i)).collect();

    for per_page in 1..=12 {
        let pages = collect_pages(&search, "error OR build", SearchScope::All, &filters, per_page)?;
        let order = assert_pages_partition(&pages, 11)?;
        assert_eq!(order, expected, "page size {per_page}");

        for page in &pages {
            assert_ranked_order(page)?;
        }
        // every page but the last is full
        for page in &pages[..pages.len() - 1] {
            assert_eq!(page.len() as i64, per_page);
        }
    }
    Ok(())
}

#[test]
fn test_ties_paginate_by_session_id() -> Result<()> {
    let mut world = TestWorld::new().with_project("p1", "Project One");
    for id in ["d", "b", "e", "a", "c"] {
        world = world.with_session(id, "p1").with_message(
            id,
            Role::User,
            "same moment",
            "2025-01-01T00:00:00",
        );
    }

    let pages = collect_pages(
        &world.search(),
        "moment",
        SearchScope::Messages,
        &SearchFilters::new(),
        2,
    )?;
    let order = assert_pages_partition(&pages, 5)?;
    assert_eq!(order, vec!["a", "b", "c", "d", "e"]);
    Ok(())
}

/// Distinct sessions in the flat row search, walked independently of grouping.
fn enumerate_sessions(
    world: &TestWorld,
    query: &str,
    scope: SearchScope,
    filters: &SearchFilters,
) -> Result<BTreeSet<String>> {
    let rows = world
        .search()
        .search_records(query, scope, filters, None, 10_000, 0)?;
    Ok(rows.into_iter().map(|row| row.session_id).collect())
}

#[test]
fn test_total_matches_independent_enumeration() -> Result<()> {
    let world = fixtures::two_projects();
    let search = world.search();

    let filter_sets = vec![
        SearchFilters::new(),
        SearchFilters::new().project("alpha"),
        SearchFilters::new().project("beta"),
        SearchFilters::new().project("nobody"),
        SearchFilters::new().tool("Bash"),
        SearchFilters::new().tool("Read").project("alpha"),
        SearchFilters::new().since("2025-03-05"),
        SearchFilters::new().until("2025-03-05"),
        SearchFilters::new()
            .since("2025-03-05T14:00:30")
            .until("2025-03-05T14:00:30"),
        SearchFilters::new().project("alpha").since("2025-03-02").until("2025-03-06"),
    ];
    let scopes = [
        SearchScope::All,
        SearchScope::Messages,
        SearchScope::ToolInputs,
        SearchScope::ToolResults,
    ];

    for query in ["parser", "the", "cargo OR changelog", "\"parser panic\""] {
        for scope in scopes {
            for filters in &filter_sets {
                let expected = enumerate_sessions(&world, query, scope, filters)?;
                let pages = collect_pages(&search, query, scope, filters, 2)?;
                let order = assert_pages_partition(&pages, expected.len())?;

                let covered: BTreeSet<String> = order.into_iter().collect();
                assert_eq!(covered, expected, "{query} {scope:?} {filters:?}");
            }
        }
    }
    Ok(())
}
