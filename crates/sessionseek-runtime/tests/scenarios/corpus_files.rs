//! Corpus File Tests
//!
//! The corpus is loaded by an outside pipeline. Searching must never change
//! the file, and opening it for writing must never discard records.

use anyhow::Result;
use sessionseek_index::SCHEMA_VERSION;
use sessionseek_runtime::{ErrorKind, SearchOps, SessionSeek};
use sessionseek_testing::fixtures;
use sessionseek_types::{SearchFilters, SearchScope};
use tempfile::TempDir;

#[test]
fn test_reopening_unversioned_corpus_keeps_records() -> Result<()> {
    let world = fixtures::hello_world().with_schema_version(0);

    let workspace = SessionSeek::open(world.data_dir())?;
    let page = workspace.search().search_grouped_by_session(
        "Hello",
        SearchScope::All,
        &SearchFilters::new(),
        3,
        0,
    )?;

    assert_eq!(page.total_sessions, 1);
    assert_eq!(page.session_order, vec!["s1"]);
    assert_eq!(world.stored_messages()?, 1);
    assert_eq!(world.schema_version()?, SCHEMA_VERSION);
    Ok(())
}

#[test]
fn test_read_only_open_leaves_file_alone() -> Result<()> {
    let world = fixtures::two_projects().with_schema_version(0);

    let search = SearchOps::open(world.data_dir())?;
    let page =
        search.search_grouped_by_session("parser", SearchScope::All, &SearchFilters::new(), 3, 0)?;
    assert_eq!(page.total_sessions, 4);
    assert_eq!(search.list_tool_names()?, vec!["Bash", "Edit", "Read"]);

    assert_eq!(world.schema_version()?, 0);
    Ok(())
}

#[test]
fn test_read_only_open_does_not_create_workspace() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let data_dir = temp_dir.path().join("never-created");

    let search = SearchOps::open(&data_dir)?;
    let err = search
        .search_grouped_by_session("Hello", SearchScope::All, &SearchFilters::new(), 3, 0)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::IndexUnavailable);
    assert!(!data_dir.exists());
    Ok(())
}

#[test]
fn test_unknown_schema_version_is_refused_not_dropped() -> Result<()> {
    let world = fixtures::hello_world().with_schema_version(SCHEMA_VERSION + 1);

    let err = match SessionSeek::open(world.data_dir()) {
        Err(err) => err,
        Ok(_) => anyhow::bail!("opening a newer corpus should be refused"),
    };
    assert_eq!(err.kind(), ErrorKind::Internal);
    assert!(err.to_string().contains("left untouched"), "{err}");

    let err = SearchOps::open(world.data_dir())?
        .search_grouped_by_session("Hello", SearchScope::All, &SearchFilters::new(), 3, 0)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Internal);

    assert_eq!(world.stored_messages()?, 1);
    assert_eq!(world.schema_version()?, SCHEMA_VERSION + 1);
    Ok(())
}
