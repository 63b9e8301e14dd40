use rusqlite::Row;
use rusqlite::types::{Type, Value};
use sessionseek_types::{
    MatchCategory, MatchDetail, MatchRow, ProjectId, Role, context_excerpt, truncate,
};

use super::adapter::{IndexAdapter, TextIndex};
use super::builder::{CategoryQuery, SearchPlan};
use crate::Result;

impl IndexAdapter<'_> {
    /// Every matching record of the plan, with display snippets.
    ///
    /// No row limit is applied; callers bound the result by restricting the
    /// plan to a window of sessions first.
    pub fn fetch_rows(&self, plan: &SearchPlan) -> Result<Vec<MatchRow>> {
        let mut params = Vec::new();
        let union = self.row_union_sql(plan, &mut params);
        let sql = format!("{union} ORDER BY ts DESC, score ASC, category ASC, record_id ASC");

        self.query_rows("fetch_rows", plan.query(), &sql, &params, |row| {
            self.map_row(plan.query(), row)
        })
    }

    pub(crate) fn row_union_sql(&self, plan: &SearchPlan, params: &mut Vec<Value>) -> String {
        plan.categories()
            .iter()
            .map(|cq| self.row_select(cq, params))
            .collect::<Vec<_>>()
            .join(" UNION ALL ")
    }

    /// One category's SELECT. Columns line up across categories so the
    /// parts can be unioned.
    fn row_select(&self, cq: &CategoryQuery, params: &mut Vec<Value>) -> String {
        let index = TextIndex::for_category(cq.category);
        let rank = index.rank_expr(self.capabilities);

        let (record_id, role, tool_name, is_error, payload) = match cq.category {
            MatchCategory::Message => (
                "CAST(m.message_id AS TEXT)",
                "m.role",
                "NULL",
                "NULL",
                "m.content",
            ),
            MatchCategory::ToolInput => (
                "t.tool_use_id",
                "NULL",
                "t.tool_name",
                "t.is_error",
                "t.tool_input",
            ),
            MatchCategory::ToolResult => (
                "t.tool_use_id",
                "NULL",
                "t.tool_name",
                "t.is_error",
                "t.tool_result",
            ),
        };

        // Snippet arguments sit before the WHERE placeholders in the text,
        // so they are bound first.
        let snippet = if cq.category == MatchCategory::Message && self.capabilities.native_snippet {
            params.push(Value::Text(self.snippets.highlight_open.clone()));
            params.push(Value::Text(self.snippets.highlight_close.clone()));
            params.push(Value::Integer(self.snippets.tokens()));
            "snippet(fts_messages, 0, ?, ?, '...', ?)"
        } else {
            "NULL"
        };

        let alias = index.alias();
        format!(
            "SELECT '{category}' AS category, {record_id} AS record_id, \
             {alias}.session_id AS session_id, s.project_id AS project_id, \
             p.project_name AS project_name, {alias}.message_index AS sequence, \
             {alias}.timestamp AS ts, {role} AS role, {tool_name} AS tool_name, \
             {is_error} AS is_error, {payload} AS payload, {snippet} AS snippet, \
             {rank} AS score \
             FROM {from} WHERE {filter}",
            category = cq.category.as_str(),
            from = index.from_clause(),
            filter = cq.where_clause(params),
        )
    }

    pub(crate) fn map_row(&self, query: &str, row: &Row<'_>) -> rusqlite::Result<MatchRow> {
        let tag: String = row.get(0)?;
        let category = MatchCategory::from_tag(&tag).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                Type::Text,
                format!("unknown match category '{tag}'").into(),
            )
        })?;

        let payload: Option<String> = row.get(10)?;
        let payload = payload.unwrap_or_default();

        let (detail, snippet) = match category {
            MatchCategory::Message => {
                let role: String = row.get(7)?;
                let role = role.parse::<Role>().map_err(|e| {
                    rusqlite::Error::FromSqlConversionFailure(7, Type::Text, Box::new(e))
                })?;
                let snippet = match row.get::<_, Option<String>>(11)? {
                    Some(native) => native,
                    None => context_excerpt(
                        &payload,
                        query,
                        self.snippets.fallback_chars,
                        &self.snippets.highlight_open,
                        &self.snippets.highlight_close,
                    ),
                };
                (MatchDetail::Message { role }, snippet)
            }
            MatchCategory::ToolInput | MatchCategory::ToolResult => {
                let detail = MatchDetail::Tool {
                    tool_name: row.get(8)?,
                    is_error: row.get::<_, Option<bool>>(9)?.unwrap_or(false),
                };
                (detail, truncate(&payload, self.snippets.tool_preview_chars))
            }
        };

        Ok(MatchRow {
            category,
            record_id: row.get(1)?,
            session_id: row.get(2)?,
            project_id: ProjectId::from(row.get::<_, String>(3)?),
            project_name: row.get(4)?,
            sequence: row.get(5)?,
            timestamp: row.get(6)?,
            detail,
            snippet,
            rank: row.get(12)?,
        })
    }
}
