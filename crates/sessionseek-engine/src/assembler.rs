use std::cmp::Ordering;
use std::collections::HashMap;

use sessionseek_types::{GroupedResults, MatchRow, SessionWindow};
use tracing::warn;

/// Group fetched rows under the sessions of `window`.
///
/// Session order is taken from the window, never from the map. Rows of
/// sessions outside the window are dropped.
pub fn assemble(
    window: &SessionWindow,
    rows: Vec<MatchRow>,
    has_more: bool,
    total_sessions: usize,
) -> GroupedResults {
    let mut grouped: HashMap<String, Vec<MatchRow>> = HashMap::with_capacity(window.len());
    for session in &window.sessions {
        grouped.insert(session.session_id.clone(), Vec::new());
    }

    let mut stray = 0usize;
    for row in rows {
        match grouped.get_mut(&row.session_id) {
            Some(bucket) => bucket.push(row),
            None => stray += 1,
        }
    }
    if stray > 0 {
        warn!(rows = stray, "dropped rows outside the session window");
    }

    for (session_id, bucket) in grouped.iter_mut() {
        if bucket.is_empty() {
            warn!(session_id = %session_id, "ranked session has no fetched rows");
        }
        sort_session_rows(bucket);
    }

    GroupedResults {
        session_order: window.ids(),
        results_by_session: grouped,
        has_more,
        total_sessions,
    }
}

/// Newest first; ties by rank (lower is more relevant), then category and id.
pub fn sort_session_rows(rows: &mut [MatchRow]) {
    rows.sort_by(compare_rows);
}

fn compare_rows(a: &MatchRow, b: &MatchRow) -> Ordering {
    // None sorts below Some, so reversing puts undated rows last
    b.timestamp
        .cmp(&a.timestamp)
        .then_with(|| a.rank.total_cmp(&b.rank))
        .then_with(|| a.category.cmp(&b.category))
        .then_with(|| a.record_id.cmp(&b.record_id))
}
