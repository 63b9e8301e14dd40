use rusqlite::types::Value;
use sessionseek_types::MatchRow;

use super::adapter::IndexAdapter;
use super::builder::SearchPlan;
use crate::Result;

impl IndexAdapter<'_> {
    /// Row-level search without session grouping.
    ///
    /// Most relevant first; newer records win rank ties.
    pub fn search_records(
        &self,
        plan: &SearchPlan,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<MatchRow>> {
        let mut params = Vec::new();
        let union = self.row_union_sql(plan, &mut params);
        let sql = format!(
            "{union} ORDER BY score ASC, ts DESC, category ASC, record_id ASC LIMIT ? OFFSET ?"
        );
        params.push(Value::Integer(limit));
        params.push(Value::Integer(offset));

        self.query_rows("search_records", plan.query(), &sql, &params, |row| {
            self.map_row(plan.query(), row)
        })
    }
}
