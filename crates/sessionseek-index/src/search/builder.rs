use rusqlite::types::Value;
use sessionseek_types::{MatchCategory, ProjectId, Role, SearchFilters, SearchScope};

use super::adapter::TextIndex;

/// One filter fragment of a category query.
///
/// Every variant renders to static SQL with `?` placeholders; the values are
/// only ever bound, never spliced into the statement text.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Full-text match against the category's field.
    Match(String),
    ProjectEq(ProjectId),
    ToolNameEq(String),
    RoleEq(Role),
    /// Inclusive lower timestamp bound, compared as an instant.
    TimestampFrom(String),
    /// Inclusive upper timestamp bound, compared as an instant.
    TimestampTo(String),
    SessionEq(String),
    SessionIn(Vec<String>),
}

/// Millisecond UTC form of an ISO-8601 timestamp, whatever its suffix.
///
/// `2025-01-02T10:00:00`, `2025-01-02T10:00:00.000Z` and
/// `2025-01-02T12:00:00+02:00` all render the same text. Unparseable
/// values become NULL and never satisfy a bound.
const INSTANT_FORMAT: &str = "%Y-%m-%dT%H:%M:%f";

fn instant(operand: &str) -> String {
    format!("strftime('{INSTANT_FORMAT}', {operand})")
}

impl Predicate {
    pub(crate) fn render(&self, category: MatchCategory) -> String {
        let alias = TextIndex::for_category(category).alias();
        match self {
            Predicate::Match(_) => format!("{} MATCH ?", TextIndex::match_target(category)),
            Predicate::ProjectEq(_) => "s.project_id = ?".to_string(),
            Predicate::ToolNameEq(_) => format!("{alias}.tool_name = ?"),
            Predicate::RoleEq(_) => format!("{alias}.role = ?"),
            Predicate::TimestampFrom(_) => {
                format!("{} >= {}", instant(&format!("{alias}.timestamp")), instant("?"))
            }
            Predicate::TimestampTo(_) => {
                format!("{} <= {}", instant(&format!("{alias}.timestamp")), instant("?"))
            }
            Predicate::SessionEq(_) => format!("{alias}.session_id = ?"),
            // An empty window selects nothing.
            Predicate::SessionIn(ids) if ids.is_empty() => "0".to_string(),
            Predicate::SessionIn(ids) => {
                let placeholders = vec!["?"; ids.len()].join(", ");
                format!("{alias}.session_id IN ({placeholders})")
            }
        }
    }

    pub(crate) fn bind(&self, params: &mut Vec<Value>) {
        match self {
            Predicate::Match(text)
            | Predicate::ToolNameEq(text)
            | Predicate::TimestampFrom(text)
            | Predicate::TimestampTo(text)
            | Predicate::SessionEq(text) => params.push(Value::Text(text.clone())),
            Predicate::ProjectEq(id) => params.push(Value::Text(id.as_str().to_string())),
            Predicate::RoleEq(role) => params.push(Value::Text(role.as_str().to_string())),
            Predicate::SessionIn(ids) => {
                params.extend(ids.iter().cloned().map(Value::Text));
            }
        }
    }

    fn applies_to(&self, category: MatchCategory) -> bool {
        match self {
            Predicate::ToolNameEq(_) => category.is_tool(),
            Predicate::RoleEq(_) => !category.is_tool(),
            _ => true,
        }
    }
}

/// The predicates of one category, combined with AND.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryQuery {
    pub category: MatchCategory,
    pub predicates: Vec<Predicate>,
}

impl CategoryQuery {
    /// `WHERE` body for this category, appending its bound values to `params`.
    pub(crate) fn where_clause(&self, params: &mut Vec<Value>) -> String {
        let mut fragments = Vec::with_capacity(self.predicates.len());
        for predicate in &self.predicates {
            fragments.push(predicate.render(self.category));
            predicate.bind(params);
        }
        fragments.join(" AND ")
    }
}

/// Per-category predicate sets for one search.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPlan {
    query: String,
    scope: SearchScope,
    categories: Vec<CategoryQuery>,
}

impl SearchPlan {
    /// The raw match-query text, for error reporting and snippet fallback.
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn scope(&self) -> SearchScope {
        self.scope
    }

    pub fn categories(&self) -> &[CategoryQuery] {
        &self.categories
    }

    /// Same plan, limited to the given sessions.
    pub fn restrict_to_sessions(&self, session_ids: &[String]) -> SearchPlan {
        self.with_predicate(Predicate::SessionIn(session_ids.to_vec()))
    }

    /// Same plan, limited to one session.
    pub fn restrict_to_session(&self, session_id: &str) -> SearchPlan {
        self.with_predicate(Predicate::SessionEq(session_id.to_string()))
    }

    fn with_predicate(&self, predicate: Predicate) -> SearchPlan {
        let mut plan = self.clone();
        for category in &mut plan.categories {
            category.predicates.push(predicate.clone());
        }
        plan
    }
}

/// Builds a [`SearchPlan`] from user input.
///
/// The match-query is not validated here; the index reports grammar errors
/// when the statement runs.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    query: String,
    scope: SearchScope,
    filters: SearchFilters,
    role: Option<Role>,
}

impl QueryBuilder {
    pub fn new(query: impl Into<String>, scope: SearchScope) -> Self {
        Self {
            query: query.into(),
            scope,
            filters: SearchFilters::default(),
            role: None,
        }
    }

    pub fn filters(mut self, filters: &SearchFilters) -> Self {
        self.filters = filters.clone();
        self
    }

    /// Restrict message rows to one speaker. Tool rows are unaffected.
    pub fn role(mut self, role: Option<Role>) -> Self {
        self.role = role;
        self
    }

    pub fn build(self) -> SearchPlan {
        let mut shared = vec![Predicate::Match(self.query.clone())];
        if let Some(project_id) = &self.filters.project_id {
            shared.push(Predicate::ProjectEq(project_id.clone()));
        }
        if let Some(tool_name) = &self.filters.tool_name {
            shared.push(Predicate::ToolNameEq(tool_name.clone()));
        }
        if let Some(role) = self.role {
            shared.push(Predicate::RoleEq(role));
        }
        if let Some(start) = &self.filters.start_time {
            shared.push(Predicate::TimestampFrom(start.clone()));
        }
        if let Some(end) = &self.filters.end_time {
            shared.push(Predicate::TimestampTo(end.clone()));
        }

        let categories = self
            .scope
            .categories()
            .iter()
            .map(|&category| CategoryQuery {
                category,
                predicates: shared
                    .iter()
                    .filter(|p| p.applies_to(category))
                    .cloned()
                    .collect(),
            })
            .collect();

        SearchPlan {
            query: self.query,
            scope: self.scope,
            categories,
        }
    }
}
