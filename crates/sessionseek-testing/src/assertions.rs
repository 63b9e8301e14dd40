//! Custom assertions for sessionseek-specific validation.
//!
//! - Walking every page of a grouped search
//! - Ranked-order and partition checks over those pages
//! - JSON structure checks for CLI output

use anyhow::{Context, Result, bail};
use serde_json::Value;
use sessionseek_runtime::SearchOps;
use sessionseek_types::{GroupedResults, SearchFilters, SearchScope};
use std::collections::HashSet;

/// Upper bound on pages walked before giving up on a runaway `has_more`.
const MAX_PAGES: i64 = 10_000;

/// Fetch pages from 0 until one reports `has_more = false`.
pub fn collect_pages(
    ops: &SearchOps,
    query: &str,
    scope: SearchScope,
    filters: &SearchFilters,
    sessions_per_page: i64,
) -> Result<Vec<GroupedResults>> {
    let mut pages = Vec::new();
    for page in 0..MAX_PAGES {
        let results =
            ops.search_grouped_by_session(query, scope, filters, sessions_per_page, page)?;
        let has_more = results.has_more;
        pages.push(results);
        if !has_more {
            return Ok(pages);
        }
    }
    bail!("has_more still set after {} pages", MAX_PAGES)
}

/// Assert that pages are disjoint and together hold exactly `total` sessions.
///
/// Returns the concatenated session order.
pub fn assert_pages_partition(pages: &[GroupedResults], total: usize) -> Result<Vec<String>> {
    let mut seen = HashSet::new();
    let mut order = Vec::new();

    for (index, page) in pages.iter().enumerate() {
        if page.total_sessions != total {
            bail!(
                "page {} reports total {} but expected {}",
                index,
                page.total_sessions,
                total
            );
        }
        for session_id in &page.session_order {
            if !seen.insert(session_id.clone()) {
                bail!("session {} appears on more than one page", session_id);
            }
            order.push(session_id.clone());
        }
    }

    if order.len() != total {
        bail!("pages cover {} sessions, expected {}", order.len(), total);
    }
    Ok(order)
}

/// Assert that sessions are ordered by latest matching timestamp, descending,
/// with ties in ascending session id order, and that rows inside each session
/// are newest first.
pub fn assert_ranked_order(results: &GroupedResults) -> Result<()> {
    let mut previous: Option<(Option<&str>, &str)> = None;

    for (session_id, rows) in results.iter() {
        let timestamps: Vec<Option<&str>> =
            rows.iter().map(|row| row.timestamp.as_deref()).collect();
        if timestamps.windows(2).any(|pair| pair[0] < pair[1]) {
            bail!("rows of session {} are not newest first: {:?}", session_id, timestamps);
        }

        let latest = rows.iter().filter_map(|row| row.timestamp.as_deref()).max();
        if let Some((prev_latest, prev_id)) = previous {
            let in_order = prev_latest > latest || (prev_latest == latest && prev_id < session_id);
            if !in_order {
                bail!(
                    "session {} ({:?}) ranked after {} ({:?})",
                    session_id,
                    latest,
                    prev_id,
                    prev_latest
                );
            }
        }
        previous = Some((latest, session_id));
    }
    Ok(())
}

/// Assert that JSON output lists sessions in exactly this order.
pub fn assert_json_session_order(json: &Value, expected: &[&str]) -> Result<()> {
    let order: Vec<&str> = json["session_order"]
        .as_array()
        .context("Expected 'session_order' array in JSON")?
        .iter()
        .filter_map(Value::as_str)
        .collect();

    if order != expected {
        bail!("Expected session order {:?}, got {:?}", expected, order);
    }

    let keys: Vec<&str> = json["results_by_session"]
        .as_object()
        .context("Expected 'results_by_session' object in JSON")?
        .keys()
        .map(String::as_str)
        .collect();
    if keys.len() != expected.len() {
        bail!("Expected {} grouped sessions, got {}", expected.len(), keys.len());
    }

    Ok(())
}

/// Assert the `total_sessions` and `has_more` fields of JSON output.
pub fn assert_json_page_info(json: &Value, total: u64, has_more: bool) -> Result<()> {
    let actual_total = json["total_sessions"]
        .as_u64()
        .context("Expected 'total_sessions' number in JSON")?;
    let actual_more = json["has_more"]
        .as_bool()
        .context("Expected 'has_more' boolean in JSON")?;

    if actual_total != total || actual_more != has_more {
        bail!(
            "Expected total={} has_more={}, got total={} has_more={}",
            total,
            has_more,
            actual_total,
            actual_more
        );
    }
    Ok(())
}
