//! Consistency Tests
//!
//! Verifies idempotent results, independent connections per call and
//! snapshot-consistent pages while a writer is active.

use anyhow::Result;
use sessionseek_index::{MessageRecord, SessionRecord};
use sessionseek_testing::fixtures;
use sessionseek_types::{ProjectId, Role, SearchFilters, SearchScope};
use std::thread;

#[test]
fn test_identical_calls_are_byte_identical() -> Result<()> {
    let world = fixtures::two_projects();
    let search = world.search();
    let filters = SearchFilters::new().since("2025-03-01");

    let first = search.search_grouped_by_session("parser OR tests", SearchScope::All, &filters, 2, 0)?;
    let second =
        search.search_grouped_by_session("parser OR tests", SearchScope::All, &filters, 2, 0)?;

    assert_eq!(first, second);
    assert_eq!(serde_json::to_string(&first)?, serde_json::to_string(&second)?);
    Ok(())
}

#[test]
fn test_serialized_sessions_follow_ranked_order() -> Result<()> {
    let world = fixtures::two_projects();

    let results = world.search().search_grouped_by_session(
        "parser",
        SearchScope::All,
        &SearchFilters::new(),
        10,
        0,
    )?;
    let json = serde_json::to_string(&results)?;

    let positions: Vec<usize> = ["\"beta-2\":", "\"alpha-2\":", "\"beta-1\":", "\"alpha-1\":"]
        .iter()
        .map(|key| json.find(key).unwrap())
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    Ok(())
}

#[test]
fn test_parallel_searches_use_their_own_connections() -> Result<()> {
    let world = fixtures::error_results(9);
    let expected = world.search().search_grouped_by_session(
        "error",
        SearchScope::All,
        &SearchFilters::new(),
        4,
        1,
    )?;

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let search = world.search();
            thread::spawn(move || {
                search.search_grouped_by_session(
                    "error",
                    SearchScope::All,
                    &SearchFilters::new(),
                    4,
                    1,
                )
            })
        })
        .collect();

    for handle in handles {
        let results = handle.join().expect("search thread panicked")?;
        assert_eq!(results, expected);
    }
    Ok(())
}

#[test]
fn test_pages_stay_consistent_during_writes() -> Result<()> {
    let world = fixtures::error_results(3);
    let search = world.search();

    let reader = thread::spawn(move || -> Result<()> {
        for _ in 0..50 {
            let results = search.search_grouped_by_session(
                "error",
                SearchScope::All,
                &SearchFilters::new(),
                2,
                1,
            )?;
            // page 1 starts at offset 2
            assert!(results.len() <= 2);
            assert_eq!(results.has_more, results.total_sessions > 2 + results.len());
            if results.total_sessions > 2 {
                assert_eq!(results.len(), (results.total_sessions - 2).min(2));
            } else {
                assert!(results.is_empty());
            }
        }
        Ok(())
    });

    let corpus = world.workspace().corpus();
    for i in 0..30 {
        let session_id = format!("late-{:02}", i);
        corpus.insert_or_update_session(&SessionRecord {
            session_id: session_id.clone(),
            project_id: ProjectId::from("p1"),
            start_time: None,
            end_time: None,
        })?;
        corpus.insert_or_update_message(&MessageRecord {
            session_id,
            message_index: 0,
            role: Role::Assistant,
            content: "another error appeared".to_string(),
            timestamp: Some(format!("2025-02-01T00:00:{:02}", i)),
        })?;
    }

    reader.join().expect("reader thread panicked")?;

    let settled = world.search().search_grouped_by_session(
        "error",
        SearchScope::All,
        &SearchFilters::new(),
        2,
        0,
    )?;
    assert_eq!(settled.total_sessions, 33);
    assert_eq!(settled.session_order, vec!["late-29", "late-28"]);
    Ok(())
}
