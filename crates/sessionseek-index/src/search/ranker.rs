use rusqlite::types::Value;
use sessionseek_types::RankedSession;

use super::adapter::{IndexAdapter, TextIndex};
use super::builder::SearchPlan;
use crate::Result;

impl IndexAdapter<'_> {
    /// Distinct matching sessions ordered by their most recent match.
    ///
    /// One grouping pass over the union of every category in the plan.
    /// Equal timestamps fall back to ascending session id so retries see
    /// the same order.
    pub fn rank_sessions(
        &self,
        plan: &SearchPlan,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<RankedSession>> {
        let mut params = Vec::new();
        let grouping = grouping_sql(plan, &mut params);
        let sql = format!(
            "{grouping} ORDER BY latest_match DESC, session_id ASC LIMIT ? OFFSET ?"
        );
        params.push(Value::Integer(limit));
        params.push(Value::Integer(offset));

        self.query_rows("rank_sessions", plan.query(), &sql, &params, |row| {
            Ok(RankedSession {
                session_id: row.get(0)?,
                latest_match: row.get(1)?,
            })
        })
    }

    /// Number of sessions the unlimited ranking would return.
    ///
    /// Re-runs the identical grouping rather than keeping a running count.
    pub fn count_sessions(&self, plan: &SearchPlan) -> Result<usize> {
        let mut params = Vec::new();
        let grouping = grouping_sql(plan, &mut params);
        let sql = format!("SELECT COUNT(*) FROM ({grouping})");

        let counts = self.query_rows("count_sessions", plan.query(), &sql, &params, |row| {
            row.get::<_, i64>(0)
        })?;
        Ok(counts.first().copied().unwrap_or(0) as usize)
    }

    /// Number of matching records under the plan, across its categories.
    pub fn count_matches(&self, plan: &SearchPlan) -> Result<usize> {
        let mut params = Vec::new();
        let union = key_union_sql(plan, &mut params);
        let sql = format!("SELECT COUNT(*) FROM ({union})");

        let counts = self.query_rows("count_matches", plan.query(), &sql, &params, |row| {
            row.get::<_, i64>(0)
        })?;
        Ok(counts.first().copied().unwrap_or(0) as usize)
    }
}

fn grouping_sql(plan: &SearchPlan, params: &mut Vec<Value>) -> String {
    let union = key_union_sql(plan, params);
    format!(
        "SELECT session_id, MAX(ts) AS latest_match FROM ({union}) GROUP BY session_id"
    )
}

/// `(session_id, ts)` of every matching record, one SELECT per category.
fn key_union_sql(plan: &SearchPlan, params: &mut Vec<Value>) -> String {
    plan.categories()
        .iter()
        .map(|cq| {
            let index = TextIndex::for_category(cq.category);
            let alias = index.alias();
            format!(
                "SELECT {alias}.session_id AS session_id, {alias}.timestamp AS ts FROM {} WHERE {}",
                index.from_clause(),
                cq.where_clause(params)
            )
        })
        .collect::<Vec<_>>()
        .join(" UNION ALL ")
}
