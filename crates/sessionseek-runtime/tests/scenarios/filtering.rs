//! Filtering Tests
//!
//! Verifies project, tool, time-range and role filters, and the
//! auxiliary per-session count and tool-name catalogue.

use anyhow::Result;
use sessionseek_testing::{TestWorld, fixtures};
use sessionseek_types::{MatchCategory, MatchDetail, Role, SearchFilters, SearchScope};

#[test]
fn test_project_without_matches_is_empty_not_an_error() -> Result<()> {
    let world = fixtures::two_projects().with_project("gamma", "Gamma");

    let results = world.search().search_grouped_by_session(
        "parser",
        SearchScope::All,
        &SearchFilters::new().project("gamma"),
        3,
        0,
    )?;
    assert!(results.is_empty());
    assert!(!results.has_more);
    assert_eq!(results.total_sessions, 0);
    Ok(())
}

#[test]
fn test_project_filter() -> Result<()> {
    let world = fixtures::two_projects();

    let results = world.search().search_grouped_by_session(
        "parser",
        SearchScope::All,
        &SearchFilters::new().project("beta"),
        3,
        0,
    )?;
    assert_eq!(results.session_order, vec!["beta-2", "beta-1"]);
    assert!(
        results
            .iter()
            .flat_map(|(_, rows)| rows)
            .all(|row| row.project_name == "Beta Library")
    );
    Ok(())
}

#[test]
fn test_tool_filter_narrows_tool_rows_only() -> Result<()> {
    let world = fixtures::two_projects();
    let filters = SearchFilters::new().tool("Read");

    let tools = world.search().search_grouped_by_session(
        "parser",
        SearchScope::ToolInputs,
        &filters,
        10,
        0,
    )?;
    assert_eq!(tools.session_order, vec!["alpha-2"]);

    // messages carry no tool name and are left alone
    let all =
        world
            .search()
            .search_grouped_by_session("parser", SearchScope::All, &filters, 10, 0)?;
    assert_eq!(all.session_order, vec!["alpha-2", "beta-1", "alpha-1"]);
    for (_, rows) in all.iter() {
        for row in rows {
            if let MatchDetail::Tool { tool_name, .. } = &row.detail {
                assert_eq!(tool_name, "Read");
            }
        }
    }
    Ok(())
}

#[test]
fn test_time_bounds_are_inclusive() -> Result<()> {
    let world = fixtures::two_projects();
    let exact = SearchFilters::new()
        .since("2025-03-05T14:00:30")
        .until("2025-03-05T14:00:30");

    let results =
        world
            .search()
            .search_grouped_by_session("parser", SearchScope::All, &exact, 10, 0)?;
    assert_eq!(results.session_order, vec!["alpha-2", "beta-1"]);
    assert_eq!(results.get("alpha-2").unwrap().len(), 1);
    Ok(())
}

#[test]
fn test_bare_until_date_covers_whole_day() -> Result<()> {
    let world = fixtures::two_projects();
    let filters = SearchFilters::new().since("2025-03-05").until("2025-03-05");

    let results =
        world
            .search()
            .search_grouped_by_session("parser", SearchScope::All, &filters, 10, 0)?;
    assert_eq!(results.session_order, vec!["alpha-2", "beta-1"]);
    assert_eq!(results.get("alpha-2").unwrap().len(), 2);
    Ok(())
}

#[test]
fn test_rfc3339_bound_is_shifted_to_utc() -> Result<()> {
    let world = fixtures::two_projects();
    // 2025-03-06T10:00:00 UTC
    let filters = SearchFilters::new().since("2025-03-06T12:00:00+02:00");

    let results =
        world
            .search()
            .search_grouped_by_session("parser", SearchScope::All, &filters, 10, 0)?;
    assert_eq!(results.session_order, vec!["beta-2"]);
    Ok(())
}

#[test]
fn test_bounds_match_suffixed_stored_timestamps() -> Result<()> {
    // "zulu" and "offset" are the same instant, 10:00 UTC
    let world = TestWorld::new()
        .with_project("p1", "Project One")
        .with_session("zulu", "p1")
        .with_message("zulu", Role::User, "deploy finished", "2025-01-02T10:00:00.000Z")
        .with_session("offset", "p1")
        .with_message("offset", Role::User, "deploy started", "2025-01-02T12:00:00+02:00")
        .with_session("later", "p1")
        .with_message("later", Role::User, "deploy again", "2025-01-02T10:00:00.001Z");

    let matching = |filters: SearchFilters| -> Result<Vec<String>> {
        let results = world.search().search_grouped_by_session(
            "deploy",
            SearchScope::Messages,
            &filters,
            10,
            0,
        )?;
        let mut ids = results.session_order.clone();
        ids.sort();
        Ok(ids)
    };

    let exact = SearchFilters::new()
        .since("2025-01-02T10:00:00Z")
        .until("2025-01-02T10:00:00Z");
    assert_eq!(matching(exact)?, vec!["offset", "zulu"]);

    let naive = SearchFilters::new()
        .since("2025-01-02T10:00:00")
        .until("2025-01-02T10:00:00.001");
    assert_eq!(matching(naive)?, vec!["later", "offset", "zulu"]);

    let whole_day = SearchFilters::new().since("2025-01-02").until("2025-01-02");
    assert_eq!(matching(whole_day)?.len(), 3);

    let before = SearchFilters::new().until("2025-01-02T09:59:59.999Z");
    assert!(matching(before)?.is_empty());
    Ok(())
}

#[test]
fn test_role_filter_on_flat_search() -> Result<()> {
    let world = fixtures::two_projects();
    let search = world.search();
    let filters = SearchFilters::new();

    let assistant =
        search.search_records("parser", SearchScope::Messages, &filters, Some(Role::Assistant), 50, 0)?;
    assert_eq!(assistant.len(), 1);
    assert_eq!(assistant[0].session_id, "alpha-1");

    // tool rows ignore the role
    let all = search.search_records("parser", SearchScope::All, &filters, Some(Role::User), 50, 0)?;
    let messages = all
        .iter()
        .filter(|row| row.category == MatchCategory::Message)
        .count();
    let tools = all.len() - messages;
    assert_eq!(messages, 3);
    assert_eq!(tools, 3);
    Ok(())
}

#[test]
fn test_flat_search_pages_without_overlap() -> Result<()> {
    let world = fixtures::error_results(6);
    let search = world.search();
    let filters = SearchFilters::new();

    let everything = search.search_records("error", SearchScope::All, &filters, None, 100, 0)?;
    assert_eq!(everything.len(), 6);

    let mut walked = Vec::new();
    for offset in (0..6).step_by(4) {
        walked.extend(search.search_records("error", SearchScope::All, &filters, None, 4, offset)?);
    }
    let ids = |rows: &[sessionseek_types::MatchRow]| -> Vec<String> {
        rows.iter().map(|row| row.record_id.clone()).collect()
    };
    assert_eq!(ids(&walked), ids(&everything));
    Ok(())
}

#[test]
fn test_count_matches_in_session() -> Result<()> {
    let world = fixtures::two_projects();
    let search = world.search();

    let filters = SearchFilters::new();
    assert_eq!(
        search.count_matches_in_session("parser", "alpha-1", SearchScope::All, &filters)?,
        3
    );
    assert_eq!(
        search.count_matches_in_session("parser", "alpha-1", SearchScope::Messages, &filters)?,
        2
    );
    assert_eq!(
        search.count_matches_in_session("parser", "alpha-3", SearchScope::All, &filters)?,
        0
    );
    assert_eq!(
        search.count_matches_in_session(
            "parser",
            "alpha-1",
            SearchScope::All,
            &SearchFilters::new().project("beta")
        )?,
        0
    );
    Ok(())
}

#[test]
fn test_list_tool_names() -> Result<()> {
    let world = fixtures::two_projects();
    assert_eq!(world.search().list_tool_names()?, vec!["Bash", "Edit", "Read"]);
    Ok(())
}
