use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::{Error, ProjectId, Role};

/// Which content categories participate in matching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchScope {
    #[default]
    All,
    Messages,
    ToolInputs,
    ToolResults,
}

impl SearchScope {
    /// Categories implicated by this scope, in union order.
    pub fn categories(&self) -> &'static [MatchCategory] {
        match self {
            SearchScope::All => &[
                MatchCategory::Message,
                MatchCategory::ToolInput,
                MatchCategory::ToolResult,
            ],
            SearchScope::Messages => &[MatchCategory::Message],
            SearchScope::ToolInputs => &[MatchCategory::ToolInput],
            SearchScope::ToolResults => &[MatchCategory::ToolResult],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SearchScope::All => "all",
            SearchScope::Messages => "messages",
            SearchScope::ToolInputs => "tool-inputs",
            SearchScope::ToolResults => "tool-results",
        }
    }
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SearchScope {
    type Err = Error;

    /// Accepts the UI labels ("Tool Inputs") as well as kebab/snake spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "all" => Ok(SearchScope::All),
            "messages" => Ok(SearchScope::Messages),
            "toolinputs" => Ok(SearchScope::ToolInputs),
            "toolresults" => Ok(SearchScope::ToolResults),
            _ => Err(Error::UnknownScope(s.to_string())),
        }
    }
}

/// Discriminator of a matching row: which index and which field matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchCategory {
    Message,
    ToolInput,
    ToolResult,
}

impl MatchCategory {
    /// Literal carried through SQL unions to tag each row.
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchCategory::Message => "message",
            MatchCategory::ToolInput => "tool_input",
            MatchCategory::ToolResult => "tool_result",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "message" => Some(MatchCategory::Message),
            "tool_input" => Some(MatchCategory::ToolInput),
            "tool_result" => Some(MatchCategory::ToolResult),
            _ => None,
        }
    }

    pub fn is_tool(&self) -> bool {
        !matches!(self, MatchCategory::Message)
    }
}

impl fmt::Display for MatchCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Optional filters, combined with logical AND.
///
/// Time bounds are inclusive and compared with the stored ISO 8601
/// timestamps as instants, at millisecond precision, whether or not those
/// carry a `Z` or offset suffix.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchFilters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<ProjectId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
}

impl SearchFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn project(mut self, project_id: impl Into<ProjectId>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn tool(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }

    pub fn since(mut self, start_time: impl Into<String>) -> Self {
        self.start_time = Some(start_time.into());
        self
    }

    pub fn until(mut self, end_time: impl Into<String>) -> Self {
        self.end_time = Some(end_time.into());
        self
    }
}

/// Category-specific display fields of a match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MatchDetail {
    Message { role: Role },
    Tool { tool_name: String, is_error: bool },
}

/// One matching record plus the fields needed to display it.
///
/// Built per query and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchRow {
    pub category: MatchCategory,
    /// Message id or tool_use_id, as text.
    pub record_id: String,
    pub session_id: String,
    pub project_id: ProjectId,
    pub project_name: String,
    /// Position of the record within its session.
    pub sequence: i64,
    pub timestamp: Option<String>,
    pub detail: MatchDetail,
    /// Highlighted excerpt (messages) or truncated payload (tools).
    pub snippet: String,
    /// Index relevance rank; lower is more relevant.
    pub rank: f64,
}

/// A session that matched, keyed by its most recent matching timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedSession {
    pub session_id: String,
    pub latest_match: Option<String>,
}

/// Sessions selected for the current page, in ranked order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionWindow {
    pub sessions: Vec<RankedSession>,
}

impl SessionWindow {
    pub fn ids(&self) -> Vec<String> {
        self.sessions.iter().map(|s| s.session_id.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// One page of session-grouped results.
///
/// `session_order` is the ranked order of the page; `results_by_session`
/// carries no order of its own, so every traversal goes through
/// [`GroupedResults::iter`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupedResults {
    pub session_order: Vec<String>,
    pub results_by_session: HashMap<String, Vec<MatchRow>>,
    pub has_more: bool,
    pub total_sessions: usize,
}

impl GroupedResults {
    pub fn empty(total_sessions: usize) -> Self {
        Self {
            total_sessions,
            ..Self::default()
        }
    }

    /// Sessions with their rows, in ranked order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[MatchRow])> {
        self.session_order.iter().map(|id| {
            let rows = self
                .results_by_session
                .get(id)
                .map(Vec::as_slice)
                .unwrap_or(&[]);
            (id.as_str(), rows)
        })
    }

    pub fn get(&self, session_id: &str) -> Option<&[MatchRow]> {
        self.results_by_session.get(session_id).map(Vec::as_slice)
    }

    /// Number of sessions on this page.
    pub fn len(&self) -> usize {
        self.session_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.session_order.is_empty()
    }

    pub fn row_count(&self) -> usize {
        self.results_by_session.values().map(Vec::len).sum()
    }
}

struct OrderedSessions<'a>(&'a GroupedResults);

impl Serialize for OrderedSessions<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (session_id, rows) in self.0.iter() {
            map.serialize_entry(session_id, rows)?;
        }
        map.end()
    }
}

impl Serialize for GroupedResults {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("GroupedResults", 4)?;
        state.serialize_field("session_order", &self.session_order)?;
        state.serialize_field("results_by_session", &OrderedSessions(self))?;
        state.serialize_field("has_more", &self.has_more)?;
        state.serialize_field("total_sessions", &self.total_sessions)?;
        state.end()
    }
}
