use std::time::Instant;

use sessionseek_engine::{PageRequest, assemble};
use sessionseek_index::{Database, SearchPlan};
use sessionseek_types::{GroupedResults, MatchRow};
use tracing::debug;

use crate::{Error, Result};

/// Search operations over one open connection.
pub struct SearchService<'a> {
    db: &'a Database,
}

impl<'a> SearchService<'a> {
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// One page of sessions with all of their matching rows.
    ///
    /// Ranking, counting and fetching share a single read snapshot, so
    /// `total_sessions` and the page agree even while a writer is active.
    pub fn grouped(&self, plan: &SearchPlan, page: PageRequest) -> Result<GroupedResults> {
        let started = Instant::now();

        let results = self.db.read_snapshot(|index| {
            let ranked = index.rank_sessions(plan, page.fetch_limit(), page.offset())?;
            let total = index.count_sessions(plan)?;
            let (window, has_more) = page.window(ranked);

            if window.is_empty() {
                return Ok::<_, Error>(GroupedResults::empty(total));
            }

            let scoped = plan.restrict_to_sessions(&window.ids());
            let rows = index.fetch_rows(&scoped)?;
            Ok(assemble(&window, rows, has_more, total))
        })?;

        debug!(
            sessions = results.len(),
            rows = results.row_count(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "assembled grouped page"
        );
        Ok(results)
    }

    /// Ungrouped rows, most relevant first.
    pub fn records(&self, plan: &SearchPlan, limit: i64, offset: i64) -> Result<Vec<MatchRow>> {
        let rows = self
            .db
            .read_snapshot(|index| index.search_records(plan, limit, offset))?;
        Ok(rows)
    }

    pub fn count_in_session(&self, plan: &SearchPlan, session_id: &str) -> Result<usize> {
        let scoped = plan.restrict_to_session(session_id);
        let count = self
            .db
            .read_snapshot(|index| index.count_matches(&scoped))?;
        Ok(count)
    }

    pub fn tool_names(&self) -> Result<Vec<String>> {
        Ok(self.db.list_tool_names()?)
    }
}
