use std::time::Instant;

use rusqlite::types::Value;
use rusqlite::{Connection, Row, params_from_iter};
use sessionseek_types::MatchCategory;
use tracing::debug;

use crate::{Error, Result};

/// Largest token window the native snippet function accepts.
pub const MAX_SNIPPET_TOKENS: u32 = 64;

/// Optional primitives of the underlying text index.
///
/// With `native_rank` off every row ranks `0.0`; with `native_snippet` off
/// message excerpts come from a substring window around the first term hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexCapabilities {
    pub native_rank: bool,
    pub native_snippet: bool,
}

impl IndexCapabilities {
    pub fn full() -> Self {
        Self {
            native_rank: true,
            native_snippet: true,
        }
    }

    pub fn none() -> Self {
        Self {
            native_rank: false,
            native_snippet: false,
        }
    }
}

impl Default for IndexCapabilities {
    fn default() -> Self {
        Self::full()
    }
}

/// How display snippets are produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnippetOptions {
    pub highlight_open: String,
    pub highlight_close: String,
    /// Token window for native snippets, clamped to `1..=MAX_SNIPPET_TOKENS`.
    pub snippet_tokens: u32,
    /// Character width of the fallback excerpt.
    pub fallback_chars: usize,
    /// Tool payloads longer than this are cut and marked.
    pub tool_preview_chars: usize,
}

impl SnippetOptions {
    pub(crate) fn tokens(&self) -> i64 {
        i64::from(self.snippet_tokens.clamp(1, MAX_SNIPPET_TOKENS))
    }
}

impl Default for SnippetOptions {
    fn default() -> Self {
        Self {
            highlight_open: "<mark>".to_string(),
            highlight_close: "</mark>".to_string(),
            snippet_tokens: MAX_SNIPPET_TOKENS,
            fallback_chars: 160,
            tool_preview_chars: 200,
        }
    }
}

/// The two independent full-text indexes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextIndex {
    /// Message content.
    Messages,
    /// Tool input and tool result payloads.
    ToolUses,
}

impl TextIndex {
    pub fn for_category(category: MatchCategory) -> Self {
        match category {
            MatchCategory::Message => TextIndex::Messages,
            MatchCategory::ToolInput | MatchCategory::ToolResult => TextIndex::ToolUses,
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            TextIndex::Messages => "fts_messages",
            TextIndex::ToolUses => "fts_tool_uses",
        }
    }

    /// Alias of the base record table in generated SQL.
    pub(crate) fn alias(&self) -> &'static str {
        match self {
            TextIndex::Messages => "m",
            TextIndex::ToolUses => "t",
        }
    }

    /// Left-hand side of MATCH. Sub-field scopes use a column filter so the
    /// match-query text itself stays untouched.
    pub(crate) fn match_target(category: MatchCategory) -> &'static str {
        match category {
            MatchCategory::Message => "fts_messages",
            MatchCategory::ToolInput => "fts_tool_uses.tool_input",
            MatchCategory::ToolResult => "fts_tool_uses.tool_result",
        }
    }

    /// FTS table joined to its records, their session and project.
    pub(crate) fn from_clause(&self) -> &'static str {
        match self {
            TextIndex::Messages => {
                "fts_messages \
                 JOIN messages m ON m.message_id = fts_messages.rowid \
                 JOIN sessions s ON s.session_id = m.session_id \
                 JOIN projects p ON p.project_id = s.project_id"
            }
            TextIndex::ToolUses => {
                "fts_tool_uses \
                 JOIN tool_uses t ON t.id = fts_tool_uses.rowid \
                 JOIN sessions s ON s.session_id = t.session_id \
                 JOIN projects p ON p.project_id = s.project_id"
            }
        }
    }

    pub(crate) fn rank_expr(&self, capabilities: IndexCapabilities) -> &'static str {
        match (self, capabilities.native_rank) {
            (_, false) => "0.0",
            (TextIndex::Messages, true) => "bm25(fts_messages)",
            (TextIndex::ToolUses, true) => "bm25(fts_tool_uses)",
        }
    }
}

/// Executes match statements against one connection.
///
/// Holds no state across calls; the connection (usually a snapshot
/// transaction) is borrowed for the adapter's lifetime.
pub struct IndexAdapter<'a> {
    pub(crate) conn: &'a Connection,
    pub(crate) location: &'a str,
    pub(crate) capabilities: IndexCapabilities,
    pub(crate) snippets: &'a SnippetOptions,
}

impl<'a> IndexAdapter<'a> {
    pub fn new(
        conn: &'a Connection,
        location: &'a str,
        capabilities: IndexCapabilities,
        snippets: &'a SnippetOptions,
    ) -> Self {
        Self {
            conn,
            location,
            capabilities,
            snippets,
        }
    }

    pub fn capabilities(&self) -> IndexCapabilities {
        self.capabilities
    }

    pub fn snippet_options(&self) -> &SnippetOptions {
        self.snippets
    }

    /// Run a statement containing MATCH and collect its rows.
    ///
    /// Preparation failures concern the fixed SQL and surface as
    /// [`Error::Database`]; failures while stepping are classified against
    /// the user's match-query.
    pub(crate) fn query_rows<T, F>(
        &self,
        statement: &'static str,
        match_query: &str,
        sql: &str,
        params: &[Value],
        mut map: F,
    ) -> Result<Vec<T>>
    where
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let started = Instant::now();
        let mut stmt = self.conn.prepare(sql)?;

        let classify = |err| Error::from_match_failure(err, match_query, self.location);
        let mut rows = stmt.query(params_from_iter(params.iter())).map_err(classify)?;

        let mut out = Vec::new();
        while let Some(row) = rows.next().map_err(classify)? {
            out.push(map(row)?);
        }

        debug!(
            statement,
            params = params.len(),
            rows = out.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "executed index statement"
        );
        Ok(out)
    }
}
